//! Domain error types.

use thiserror::Error;

use crate::book::BookError;
use crate::loan::LoanError;
use crate::member::MemberError;
use crate::values::ValueError;

/// Errors that can occur during domain operations.
///
/// Every variant is either a validation failure (malformed input, caught at
/// construction) or a state failure (operation not permitted in the current
/// aggregate state). Neither is recoverable internally; callers translate
/// them at the boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A value object rejected its input.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A book entity operation failed.
    #[error(transparent)]
    Book(#[from] BookError),

    /// A member entity operation failed.
    #[error(transparent)]
    Member(#[from] MemberError),

    /// A loan aggregate operation failed.
    #[error(transparent)]
    Loan(#[from] LoanError),
}

impl DomainError {
    /// Returns true if the error is a validation failure the caller can fix
    /// by correcting the input, as opposed to a state conflict.
    pub fn is_validation(&self) -> bool {
        match self {
            DomainError::Value(_) => true,
            DomainError::Book(e) => e.is_validation(),
            DomainError::Member(e) => e.is_validation(),
            DomainError::Loan(e) => e.is_validation(),
        }
    }
}
