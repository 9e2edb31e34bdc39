use serde::{Deserialize, Serialize};

use super::{ValueError, require_non_blank};

/// An International Standard Book Number in cleaned form.
///
/// Hyphens and spaces are stripped on construction, so `"978-0134685991"`
/// and `"9780134685991"` compare equal. The cleaned value must be exactly
/// 10 or 13 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    /// Parses an ISBN, stripping hyphens and spaces before validation.
    pub fn new(value: &str) -> Result<Self, ValueError> {
        require_non_blank("ISBN", value)?;

        let cleaned: String = value.chars().filter(|c| *c != '-' && *c != ' ').collect();

        let length = cleaned.chars().count();
        if length != 10 && length != 13 {
            return Err(ValueError::InvalidIsbnLength {
                value: value.to_string(),
            });
        }

        if !cleaned.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValueError::InvalidIsbnDigits {
                value: value.to_string(),
            });
        }

        Ok(Self(cleaned))
    }

    /// Returns the cleaned digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
