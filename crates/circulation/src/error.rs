//! Workflow error types.

use common::{BookId, LoanId, MemberId};
use domain::{BookError, DomainError, Email, Isbn, LoanError, MemberError, ValueError};
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum CirculationError {
    /// No book with the given id.
    #[error("book not found: {0}")]
    BookNotFound(BookId),

    /// No member with the given id.
    #[error("member not found: {0}")]
    MemberNotFound(MemberId),

    /// No loan with the given id.
    #[error("loan not found: {0}")]
    LoanNotFound(LoanId),

    /// The requested book is currently borrowed.
    #[error("book is not available: {title}")]
    BookNotAvailable { title: String },

    /// The member is deactivated and may not borrow.
    #[error("member is not active: {name}")]
    MemberNotActive { name: String },

    /// The member already has the maximum number of open loans.
    #[error("member has reached the maximum of {limit} active loans")]
    LoanLimitReached { limit: u32 },

    /// Another book already carries this ISBN.
    #[error("a book with ISBN {0} already exists")]
    DuplicateIsbn(Isbn),

    /// Another member already uses this email.
    #[error("a member with email {0} already exists")]
    DuplicateEmail(Email),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValueError> for CirculationError {
    fn from(e: ValueError) -> Self {
        CirculationError::Domain(DomainError::Value(e))
    }
}

impl From<BookError> for CirculationError {
    fn from(e: BookError) -> Self {
        CirculationError::Domain(DomainError::Book(e))
    }
}

impl From<MemberError> for CirculationError {
    fn from(e: MemberError) -> Self {
        CirculationError::Domain(DomainError::Member(e))
    }
}

impl From<LoanError> for CirculationError {
    fn from(e: LoanError) -> Self {
        CirculationError::Domain(DomainError::Loan(e))
    }
}

/// Convenience type alias for workflow results.
pub type Result<T> = std::result::Result<T, CirculationError>;
