//! Shared identifier types for the library lending system.

pub mod types;

pub use types::{BookId, LoanId, MemberId, ParseIdError};
