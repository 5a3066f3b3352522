//! Error types for match history and the champion ledger.

use std::time::Duration;
use thiserror::Error;

use crate::db::timeouts::TimeoutError;

/// Result type for match recording
pub type RecorderResult<T> = Result<T, RecorderError>;

/// Match history errors
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insert did not complete in time
    #[error("Match history write timed out after {0:?}")]
    Timeout(Duration),

    /// Value does not fit its column
    #[error("Match history {0} out of range: {1}")]
    OutOfRange(&'static str, String),
}

impl From<TimeoutError> for RecorderError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => RecorderError::Timeout(duration),
            TimeoutError::Database(e) => RecorderError::Database(e),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Champion ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ledger answered with a non-success status
    #[error("Ledger rejected entry: {status} {body}")]
    Rejected { status: u16, body: String },
}
