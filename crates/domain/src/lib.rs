//! Domain layer for the library lending system.
//!
//! This crate provides the core domain model:
//! - Self-validating value objects (`Money`, `Isbn`, `Email`, `Address`)
//! - `Book` and `Member` entities with identity-based equality
//! - The `Loan` aggregate root and its status state machine
//! - The tiered `LateFeeCalculator` domain service
//! - `LendingEvent` domain events published by the workflow layer
//!
//! Everything here is synchronous and free of I/O; persistence and event
//! delivery are collaborators consumed by the `circulation` crate.

pub mod book;
pub mod error;
pub mod events;
pub mod fees;
pub mod loan;
pub mod member;
pub mod values;

pub use book::{Book, BookError};
pub use error::DomainError;
pub use events::{
    BookBorrowedData, BookReturnedData, LendingEvent, LoanExtendedData, LoanOverdueData,
};
pub use fees::LateFeeCalculator;
pub use loan::{LOAN_PERIOD_DAYS, Loan, LoanError, LoanStatus};
pub use member::{Member, MemberError};
pub use values::{Address, Email, Isbn, Money, ValueError};
