//! Application services for the lending workflows.
//!
//! This is the only layer that coordinates multiple aggregates. Each
//! operation loads what it needs through the repository collaborators,
//! finishes every check before the first write, lets the aggregates
//! enforce their own rules, persists the results, and publishes domain
//! events. Domain logic itself stays in the `domain` crate.

pub mod books;
pub mod error;
pub mod loans;
pub mod members;

pub use books::BookService;
pub use error::{CirculationError, Result};
pub use loans::{DEFAULT_MAX_ACTIVE_LOANS, LateFeeReport, LoanService};
pub use members::MemberService;
