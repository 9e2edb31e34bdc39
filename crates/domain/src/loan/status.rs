//! Loan status state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The status of a loan in its lifecycle.
///
/// Transitions:
/// ```text
/// Active ──► Extended ──► Returned
///    │                       ▲
///    └───────────────────────┘
/// ```
///
/// `Returned` is terminal, and `Active → Extended` may happen at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Currently borrowed.
    Active,

    /// The loan period has been extended (one-shot).
    Extended,

    /// The book has come back (terminal).
    Returned,

    /// Declared as a reporting label only. No transition ever stores this
    /// status; overdueness is derived from the due date on read.
    Overdue,
}

impl LoanStatus {
    /// Returns true while the book is still out (counts toward the
    /// member's loan limit).
    pub fn is_open(&self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Extended)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Returned)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Extended => "Extended",
            LoanStatus::Returned => "Returned",
            LoanStatus::Overdue => "Overdue",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing a status from its textual form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown loan status {0:?}")]
pub struct ParseLoanStatusError(String);

impl std::str::FromStr for LoanStatus {
    type Err = ParseLoanStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(LoanStatus::Active),
            "Extended" => Ok(LoanStatus::Extended),
            "Returned" => Ok(LoanStatus::Returned),
            "Overdue" => Ok(LoanStatus::Overdue),
            other => Err(ParseLoanStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_statuses() {
        assert!(LoanStatus::Active.is_open());
        assert!(LoanStatus::Extended.is_open());
        assert!(!LoanStatus::Returned.is_open());
        assert!(!LoanStatus::Overdue.is_open());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!LoanStatus::Active.is_terminal());
        assert!(!LoanStatus::Extended.is_terminal());
        assert!(LoanStatus::Returned.is_terminal());
    }

    #[test]
    fn display_and_parse_roundtrip() {
        for status in [
            LoanStatus::Active,
            LoanStatus::Extended,
            LoanStatus::Returned,
            LoanStatus::Overdue,
        ] {
            let parsed: LoanStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        assert!("Lost".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn serialization() {
        let json = serde_json::to_string(&LoanStatus::Extended).unwrap();
        assert_eq!(json, "\"Extended\"");
        let deserialized: LoanStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, LoanStatus::Extended);
    }
}
