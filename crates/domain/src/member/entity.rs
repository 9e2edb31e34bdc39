//! Member entity.

use chrono::{NaiveDate, Utc};
use common::MemberId;

use crate::values::{Address, Email};

use super::MemberError;

/// A registered library member.
///
/// Contact details are value objects and are replaced wholesale, never
/// edited in place. Deactivation blocks new borrowing but keeps history.
#[derive(Debug, Clone)]
pub struct Member {
    id: MemberId,
    name: String,
    email: Email,
    address: Address,
    member_since: NaiveDate,
    active: bool,
}

impl Member {
    /// Registers a new member. New members start out active, with
    /// `member_since` set to today.
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        email: Email,
        address: Address,
    ) -> Result<Self, MemberError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MemberError::EmptyName);
        }

        Ok(Self {
            id,
            name,
            email,
            address,
            member_since: Utc::now().date_naive(),
            active: true,
        })
    }

    /// Rebuilds a member from persisted state.
    pub fn restore(
        id: MemberId,
        name: impl Into<String>,
        email: Email,
        address: Address,
        member_since: NaiveDate,
        active: bool,
    ) -> Result<Self, MemberError> {
        let mut member = Self::new(id, name, email, address)?;
        member.member_since = member_since;
        member.active = active;
        Ok(member)
    }

    /// Replaces the member's address.
    pub fn update_address(&mut self, new_address: Address) {
        self.address = new_address;
    }

    /// Replaces the member's email.
    pub fn update_email(&mut self, new_email: Email) {
        self.email = new_email;
    }

    /// Deactivates the member. Fails if already inactive.
    pub fn deactivate(&mut self) -> Result<(), MemberError> {
        if !self.active {
            return Err(MemberError::AlreadyInactive);
        }
        self.active = false;
        Ok(())
    }

    /// Reactivates the member. Fails if already active.
    pub fn activate(&mut self) -> Result<(), MemberError> {
        if self.active {
            return Err(MemberError::AlreadyActive);
        }
        self.active = true;
        Ok(())
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn member_since(&self) -> NaiveDate {
        self.member_since
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

// Entities are equal iff they share an identity, regardless of attributes.
impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Member[id={}, name={}, email={}, active={}]",
            self.id, self.name, self.email, self.active
        )
    }
}
