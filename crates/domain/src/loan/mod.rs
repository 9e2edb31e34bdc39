//! Loan aggregate and related types.

mod aggregate;
mod status;

pub use aggregate::{LOAN_PERIOD_DAYS, Loan};
pub use status::{LoanStatus, ParseLoanStatusError};

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during loan operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoanError {
    /// The loan has already been returned; `Returned` is terminal.
    #[error("loan is already returned")]
    AlreadyReturned,

    /// A loan may be extended at most once, regardless of how many days
    /// the first extension used.
    #[error("loan has already been extended once")]
    AlreadyExtended,

    /// Returned loans cannot be extended.
    #[error("cannot extend a returned loan")]
    CannotExtendReturned,

    /// Extension length outside the allowed range.
    #[error("extension must be between 1 and 14 days, got {days}")]
    InvalidExtensionDays { days: i64 },

    /// Note text was empty or whitespace-only.
    #[error("note cannot be empty")]
    EmptyNote,

    /// Late fees only exist for overdue loans.
    #[error("loan is not overdue")]
    NotOverdue,

    /// Persisted state violated the due-date ordering invariant.
    #[error("due date {due_date} precedes borrowed date {borrowed_date}")]
    DueDateBeforeBorrowed {
        borrowed_date: NaiveDate,
        due_date: NaiveDate,
    },

    /// Persisted state had a returned date without `Returned` status, or
    /// the other way around.
    #[error("returned date must be present exactly when the loan is returned")]
    ReturnedDateMismatch,
}

impl LoanError {
    /// True for input-validation failures, false for state conflicts.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoanError::InvalidExtensionDays { .. }
                | LoanError::EmptyNote
                | LoanError::NotOverdue
                | LoanError::DueDateBeforeBorrowed { .. }
                | LoanError::ReturnedDateMismatch
        )
    }
}
