//! Error types for mtsyft-results
//!
//! Only two situations abort a comparison: a variant log that cannot be
//! opened, and a configuration that cannot describe a sweep. Unparsable rows
//! are absorbed by the record store and only surface here on request.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single log row was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Row did not have exactly three fields
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    /// Elapsed field is not a number
    #[error("elapsed time {0:?} is not a number")]
    NotANumber(String),

    /// Elapsed field is negative, NaN or infinite
    #[error("elapsed time {0:?} is not a finite non-negative number of seconds")]
    OutOfRange(String),

    /// Row could not be decoded at all (e.g. invalid UTF-8)
    #[error("unreadable row: {0}")]
    Unreadable(String),
}

/// A timing log row that was excluded from its record store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed record in {variant} log at line {line}: {reason}")]
pub struct MalformedRecordError {
    /// Variant whose log contained the row
    pub variant: String,
    /// 1-based line number in the log
    pub line: u64,
    /// What was wrong with the row
    pub reason: MalformedReason,
}

/// mtsyft-results error types
#[derive(Error, Debug)]
pub enum Error {
    /// A variant's timing log could not be opened (fatal)
    #[error("timing log for variant {variant} could not be opened at {}: {source}", path.display())]
    MissingSource {
        /// Variant the log belongs to
        variant: String,
        /// Path that was tried
        path: PathBuf,
        /// Underlying IO failure
        source: std::io::Error,
    },

    /// A rejected row, surfaced by strict ingestion
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),

    /// Invalid family, sweep, template or variant configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file is not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage error (Parquet)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
