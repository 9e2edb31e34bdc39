//! Value objects: immutable, identity-less, compared by value.
//!
//! Construction validates every invariant and fails on the first violated
//! rule; once built, values cannot be mutated.

mod address;
mod email;
mod isbn;
mod money;

pub use address::Address;
pub use email::Email;
pub use isbn::Isbn;
pub use money::Money;

use thiserror::Error;

/// Errors raised when a value object rejects its input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    /// A required field was empty or whitespace-only.
    #[error("{field} cannot be empty")]
    Blank { field: &'static str },

    /// The email did not match the accepted address pattern.
    #[error("invalid email format: {value:?}")]
    InvalidEmail { value: String },

    /// The ISBN was not 10 or 13 characters once hyphens and spaces are
    /// stripped.
    #[error("ISBN must be 10 or 13 characters long (excluding hyphens): {value:?}")]
    InvalidIsbnLength { value: String },

    /// The ISBN contained something other than digits.
    #[error("ISBN must contain only digits: {value:?}")]
    InvalidIsbnDigits { value: String },

    /// Two amounts in different currencies cannot be combined.
    #[error("cannot add {other} to {currency} amounts")]
    CurrencyMismatch { currency: String, other: String },
}

/// Rejects empty or whitespace-only input for a named field.
fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValueError> {
    if value.trim().is_empty() {
        Err(ValueError::Blank { field })
    } else {
        Ok(())
    }
}
