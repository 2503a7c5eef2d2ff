//! Tag-length-value fields of the BR Code grammar.

use crate::error::{PixError, Result};
use std::fmt;

/// Largest value a two-digit length prefix can describe.
///
/// Lengths count bytes. Every emitted value is ASCII (keys, transaction ids
/// and normalized names and cities are checked), so this is also the character
/// count and matches the one-byte-per-character CRC input.
pub const MAX_VALUE_LEN: usize = 99;

/// The tags this crate emits, top level and nested.
///
/// Nested tags reuse ids of the top level (`Gui` and `PayloadFormatIndicator`
/// are both `00`), so the id alone does not identify a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    PayloadFormatIndicator,
    MerchantAccountInfo,
    /// Inside `MerchantAccountInfo`.
    Gui,
    /// Inside `MerchantAccountInfo`.
    PixKey,
    MerchantCategoryCode,
    TransactionCurrency,
    TransactionAmount,
    CountryCode,
    MerchantName,
    MerchantCity,
    AdditionalData,
    /// Inside `AdditionalData`.
    ReferenceLabel,
    Crc,
}

impl Tag {
    pub fn id(self) -> &'static str {
        match self {
            Tag::PayloadFormatIndicator => "00",
            Tag::MerchantAccountInfo => "26",
            Tag::Gui => "00",
            Tag::PixKey => "01",
            Tag::MerchantCategoryCode => "52",
            Tag::TransactionCurrency => "53",
            Tag::TransactionAmount => "54",
            Tag::CountryCode => "58",
            Tag::MerchantName => "59",
            Tag::MerchantCity => "60",
            Tag::AdditionalData => "62",
            Tag::ReferenceLabel => "05",
            Tag::Crc => "63",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::PayloadFormatIndicator => "payload format indicator",
            Tag::MerchantAccountInfo => "merchant account info",
            Tag::Gui => "gui",
            Tag::PixKey => "key",
            Tag::MerchantCategoryCode => "merchant category code",
            Tag::TransactionCurrency => "currency",
            Tag::TransactionAmount => "amount",
            Tag::CountryCode => "country code",
            Tag::MerchantName => "name",
            Tag::MerchantCity => "city",
            Tag::AdditionalData => "additional data",
            Tag::ReferenceLabel => "transaction id",
            Tag::Crc => "crc",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id(), self.name())
    }
}

/// Renders `id + len2(value) + value`.
///
/// Values longer than [`MAX_VALUE_LEN`] bytes are rejected; truncating them
/// would change what the payer is sent to.
pub fn format_field(tag: Tag, value: &str) -> Result<String> {
    let len = value.len();
    if len > MAX_VALUE_LEN {
        return Err(PixError::InvalidFieldLength {
            field: tag.name(),
            len,
            max: MAX_VALUE_LEN,
        });
    }
    Ok(format!("{}{:02}{}", tag.id(), len, value))
}

/// A field read back from a payload.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TlvField<'a> {
    pub id: &'a str,
    pub value: &'a str,
}

/// Walks a concatenation of TLV fields.
pub struct TlvReader<'a> {
    rest: &'a str,
}

impl<'a> TlvReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn read_field(&mut self) -> Result<TlvField<'a>> {
        let header = self.rest.get(..4).ok_or_else(|| {
            PixError::MalformedPayload(format!("truncated field at {:?}", self.rest))
        })?;
        if !header.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::MalformedPayload(format!(
                "invalid field header {header:?}"
            )));
        }
        let (id, len) = header.split_at(2);
        let len: usize = len
            .parse()
            .map_err(|_| PixError::MalformedPayload(format!("invalid length in {header:?}")))?;
        let value = self.rest.get(4..4 + len).ok_or_else(|| {
            PixError::MalformedPayload(format!("field {id} declares {len} bytes past the end"))
        })?;
        self.rest = &self.rest[4 + len..];
        Ok(TlvField { id, value })
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<TlvField<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let field = self.read_field();
        if field.is_err() {
            self.rest = "";
        }
        Some(field)
    }
}
