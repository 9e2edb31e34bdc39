//! Book entity and related types.

mod entity;

pub use entity::Book;

use thiserror::Error;

/// Errors that can occur during book operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    /// Title was empty or whitespace-only.
    #[error("title cannot be empty")]
    EmptyTitle,

    /// Author was empty or whitespace-only.
    #[error("author cannot be empty")]
    EmptyAuthor,

    /// The book was already available; no-op transitions are rejected.
    #[error("book is already available")]
    AlreadyAvailable,

    /// The book was already unavailable.
    #[error("book is already unavailable")]
    AlreadyUnavailable,
}

impl BookError {
    /// True for input-validation failures, false for state conflicts.
    pub fn is_validation(&self) -> bool {
        matches!(self, BookError::EmptyTitle | BookError::EmptyAuthor)
    }
}
