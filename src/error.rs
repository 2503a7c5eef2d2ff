use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixError {
    #[error("Field {field} is {len} characters long, at most {max} allowed")]
    InvalidFieldLength {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("Field {field} contains characters outside ASCII: {value:?}")]
    InvalidCharacters { field: &'static str, value: String },
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("Malformed amount: {0}")]
    MalformedAmount(String),
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PixError>;
