use crate::error::{PixError, Result};
use serde::Serialize;
use std::io::Write;

/// One output row of a batch run: either a payload or the reason the input
/// row was rejected.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct PayloadRecord {
    pub row: usize,
    pub key: String,
    pub payload: String,
    pub error: String,
}

impl PayloadRecord {
    pub fn encoded(row: usize, key: &str, payload: String) -> Self {
        Self {
            row,
            key: key.to_string(),
            payload,
            error: String::new(),
        }
    }

    pub fn rejected(row: usize, key: &str, error: &PixError) -> Self {
        Self {
            row,
            key: key.to_string(),
            payload: String::new(),
            error: error.to_string(),
        }
    }
}

/// Writes batch results as CSV with a `row,key,payload,error` header.
pub struct PayloadWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PayloadWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_record(&mut self, record: &PayloadRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
