//! Store error types.

use thiserror::Error;

/// Errors that can occur in the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected or failed an operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted record no longer satisfies domain invariants.
    #[error("stored record is invalid: {0}")]
    Corrupt(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
