//! Folding of human-entered names and cities into the BR Code charset.

use unicode_normalization::UnicodeNormalization;

/// Maximum length of the merchant name (tag `59`).
pub const NAME_MAX_LEN: usize = 25;

/// Maximum length applied to the merchant city (tag `60`).
///
/// The landing page has always cut cities at the same width as names. The
/// BR Code manual reserves only [`STANDARD_CITY_MAX_LEN`] characters for this
/// field, so payloads with long city names may be refused by stricter readers.
pub const CITY_MAX_LEN: usize = 25;

/// City length reserved by the BR Code manual.
pub const STANDARD_CITY_MAX_LEN: usize = 15;

/// Combining Diacritical Marks block.
fn is_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Decomposes `input`, drops diacritical marks, uppercases what is left and
/// keeps at most `max_len` characters.
///
/// Empty input yields an empty string.
pub fn normalize(input: &str, max_len: usize) -> String {
    input
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .collect::<String>()
        .to_uppercase()
        .chars()
        .take(max_len)
        .collect()
}
