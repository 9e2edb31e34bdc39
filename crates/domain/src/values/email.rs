use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ValueError, require_non_blank};

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
    })
}

/// A validated email address, normalized to lowercase.
///
/// Two addresses that differ only in case compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email address.
    pub fn new(value: &str) -> Result<Self, ValueError> {
        require_non_blank("email", value)?;

        if !email_pattern().is_match(value) {
            return Err(ValueError::InvalidEmail {
                value: value.to_string(),
            });
        }

        Ok(Self(value.to_lowercase()))
    }

    /// Returns the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
