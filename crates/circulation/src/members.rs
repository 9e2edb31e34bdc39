//! Membership application service.

use std::sync::Arc;

use common::MemberId;
use domain::{Address, Email, Member};
use store::MemberRepository;

use crate::error::{CirculationError, Result};

/// Manages member registration and standing.
pub struct MemberService {
    members: Arc<dyn MemberRepository>,
}

impl MemberService {
    /// Creates a new service over the given repository.
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    /// Registers a new member.
    ///
    /// The email must parse and must not already be in use.
    #[tracing::instrument(skip(self))]
    pub async fn create_member(
        &self,
        name: &str,
        email: &str,
        street: &str,
        city: &str,
        postal_code: &str,
        country: &str,
    ) -> Result<Member> {
        let email = Email::new(email)?;

        if self.members.exists_by_email(&email).await? {
            return Err(CirculationError::DuplicateEmail(email));
        }

        let address = Address::new(street, city, postal_code, country)?;
        let member = Member::new(MemberId::generate(), name, email, address)?;
        self.members.save(&member).await?;

        tracing::info!(member_id = %member.id(), "member registered");
        Ok(member)
    }

    /// Loads a member by id.
    pub async fn get_member(&self, id: MemberId) -> Result<Member> {
        self.members
            .find_by_id(id)
            .await?
            .ok_or(CirculationError::MemberNotFound(id))
    }

    /// Every registered member.
    pub async fn all_members(&self) -> Result<Vec<Member>> {
        Ok(self.members.find_all().await?)
    }

    /// Members currently allowed to borrow.
    pub async fn active_members(&self) -> Result<Vec<Member>> {
        Ok(self.members.find_active().await?)
    }

    /// Case-insensitive partial name search.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Member>> {
        Ok(self.members.find_by_name_containing(name).await?)
    }

    /// Replaces a member's email, keeping the uniqueness guarantee.
    #[tracing::instrument(skip(self))]
    pub async fn change_email(&self, id: MemberId, new_email: &str) -> Result<Member> {
        let new_email = Email::new(new_email)?;
        let mut member = self.get_member(id).await?;

        if member.email() != &new_email && self.members.exists_by_email(&new_email).await? {
            return Err(CirculationError::DuplicateEmail(new_email));
        }

        member.update_email(new_email);
        self.members.save(&member).await?;
        Ok(member)
    }

    /// Replaces a member's address.
    #[tracing::instrument(skip(self))]
    pub async fn change_address(
        &self,
        id: MemberId,
        street: &str,
        city: &str,
        postal_code: &str,
        country: &str,
    ) -> Result<Member> {
        let address = Address::new(street, city, postal_code, country)?;
        let mut member = self.get_member(id).await?;
        member.update_address(address);
        self.members.save(&member).await?;
        Ok(member)
    }

    /// Deactivates a member, blocking further borrowing.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate(&self, id: MemberId) -> Result<Member> {
        let mut member = self.get_member(id).await?;
        member.deactivate()?;
        self.members.save(&member).await?;
        Ok(member)
    }

    /// Reactivates a member.
    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, id: MemberId) -> Result<Member> {
        let mut member = self.get_member(id).await?;
        member.activate()?;
        self.members.save(&member).await?;
        Ok(member)
    }
}
