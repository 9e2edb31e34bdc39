use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when parsing an identifier from its textual form.
#[derive(Debug, Error)]
#[error("invalid identifier {input:?}: {source}")]
pub struct ParseIdError {
    input: String,
    #[source]
    source: uuid::Error,
}

impl ParseIdError {
    fn new(input: &str, source: uuid::Error) -> Self {
        Self {
            input: input.to_string(),
            source,
        }
    }
}

/// Unique identifier for a book.
///
/// Wraps a UUID to provide type safety: a `BookId` can never be passed
/// where a `MemberId` or `LoanId` is expected, even though all three are
/// structurally a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    /// Generates a new random book ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a book ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BookId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| ParseIdError::new(s, e))
    }
}

impl From<Uuid> for BookId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<BookId> for Uuid {
    fn from(id: BookId) -> Self {
        id.0
    }
}

/// Unique identifier for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    /// Generates a new random member ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a member ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MemberId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| ParseIdError::new(s, e))
    }
}

impl From<Uuid> for MemberId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<MemberId> for Uuid {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

/// Unique identifier for a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(Uuid);

impl LoanId {
    /// Generates a new random loan ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a loan ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LoanId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| ParseIdError::new(s, e))
    }
}

impl From<Uuid> for LoanId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<LoanId> for Uuid {
    fn from(id: LoanId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_id_generate_creates_unique_ids() {
        let id1 = BookId::generate();
        let id2 = BookId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn book_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = BookId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn book_id_display_roundtrip() {
        let id = BookId::generate();
        let parsed: BookId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn member_id_display_roundtrip() {
        let id = MemberId::generate();
        let parsed: MemberId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn loan_id_display_roundtrip() {
        let id = LoanId::generate();
        let parsed: LoanId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn malformed_id_fails_to_parse() {
        let result = "not-a-uuid".parse::<LoanId>();
        assert!(result.is_err());
    }

    #[test]
    fn id_serialization_roundtrip() {
        let id = MemberId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: MemberId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn id_serializes_as_plain_uuid_string() {
        let uuid = Uuid::new_v4();
        let id = BookId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }
}
