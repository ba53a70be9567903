//! # Persistence Errors
//!
//! Error types for the CSV persistence layer, wrapping csv and IO errors.

use minibank_core::CoreError;
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A single line that could not be turned into a domain object.
    /// Importers log and skip these instead of aborting.
    #[error("Invalid record in {file} line {line}: {reason}")]
    InvalidRecord {
        file: String,
        line: u64,
        reason: String,
    },

    #[error("Domain error: {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn invalid_record(file: &str, line: u64, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            file: file.to_string(),
            line,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. })
    }
}
