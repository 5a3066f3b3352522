//! Store error types.

use std::time::Duration;
use thiserror::Error;

use crate::db::timeouts::TimeoutError;

/// Tournament store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored state could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored state decoded but does not describe a valid bracket
    #[error("Corrupt tournament state for {0}")]
    Corrupt(String),

    /// Store did not answer in time
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Someone else wrote the tournament since it was loaded
    #[error("Version conflict for {key}: expected {expected}, found {actual:?}")]
    VersionConflict {
        key: String,
        expected: u64,
        actual: Option<u64>,
    },

    /// Key now holds a different tournament than the one that was loaded
    #[error("Tournament {0} was replaced since it was loaded")]
    Superseded(String),
}

impl From<TimeoutError> for StoreError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => StoreError::Timeout(duration),
            TimeoutError::Database(e) => StoreError::Database(e),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
