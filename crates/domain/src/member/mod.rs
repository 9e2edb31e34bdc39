//! Member entity and related types.

mod entity;

pub use entity::Member;

use thiserror::Error;

/// Errors that can occur during member operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemberError {
    /// Name was empty or whitespace-only.
    #[error("name cannot be empty")]
    EmptyName,

    /// The member is already active; no-op transitions are rejected.
    #[error("member is already active")]
    AlreadyActive,

    /// The member is already inactive.
    #[error("member is already inactive")]
    AlreadyInactive,
}

impl MemberError {
    /// True for input-validation failures, false for state conflicts.
    pub fn is_validation(&self) -> bool {
        matches!(self, MemberError::EmptyName)
    }
}
