use crate::domain::identity::PaymentRequest;
use crate::error::{PixError, Result};
use std::io::Read;

/// Reads payment requests from a CSV source.
///
/// Expected header: `key,name,city,amount,transaction_id`; the last two
/// columns may be empty or missing.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<PaymentRequest>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct IdentityReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> IdentityReader<R> {
    /// Creates a new `IdentityReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes requests.
    pub fn requests(self) -> impl Iterator<Item = Result<PaymentRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PixError::from))
    }
}
