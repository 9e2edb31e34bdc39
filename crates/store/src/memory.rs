//! In-memory repository implementations for testing and local runs.
//!
//! These hold aggregates in a `HashMap` behind an `RwLock` and provide the
//! same interface as the PostgreSQL implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{BookId, LoanId, MemberId};
use domain::{Book, Email, Isbn, Loan, LoanStatus, Member};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::repository::{BookRepository, LoanRepository, MemberRepository};

/// In-memory book repository.
#[derive(Clone, Default)]
pub struct InMemoryBookRepository {
    books: Arc<RwLock<HashMap<BookId, Book>>>,
}

impl InMemoryBookRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored books.
    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn save(&self, book: &Book) -> Result<()> {
        self.books.write().await.insert(book.id(), book.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        let mut all: Vec<_> = books.values().cloned().collect();
        all.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(all)
    }

    async fn find_available(&self) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        let mut available: Vec<_> = books
            .values()
            .filter(|b| b.is_available())
            .cloned()
            .collect();
        available.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(available)
    }

    async fn find_by_title_containing(&self, title: &str) -> Result<Vec<Book>> {
        let needle = title.to_lowercase();
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|b| b.title().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_by_author_containing(&self, author: &str) -> Result<Vec<Book>> {
        let needle = author.to_lowercase();
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|b| b.author().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn exists_by_isbn(&self, isbn: &Isbn) -> Result<bool> {
        let books = self.books.read().await;
        Ok(books.values().any(|b| b.isbn() == isbn))
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.values().find(|b| b.isbn() == isbn).cloned())
    }
}

/// In-memory member repository.
#[derive(Clone, Default)]
pub struct InMemoryMemberRepository {
    members: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl InMemoryMemberRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn save(&self, member: &Member) -> Result<()> {
        self.members
            .write()
            .await
            .insert(member.id(), member.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        Ok(self.members.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Member>> {
        let members = self.members.read().await;
        let mut all: Vec<_> = members.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }

    async fn find_active(&self) -> Result<Vec<Member>> {
        let members = self.members.read().await;
        let mut active: Vec<_> = members
            .values()
            .filter(|m| m.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(active)
    }

    async fn find_by_name_containing(&self, name: &str) -> Result<Vec<Member>> {
        let needle = name.to_lowercase();
        let members = self.members.read().await;
        Ok(members
            .values()
            .filter(|m| m.name().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool> {
        let members = self.members.read().await;
        Ok(members.values().any(|m| m.email() == email))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>> {
        let members = self.members.read().await;
        Ok(members.values().find(|m| m.email() == email).cloned())
    }
}

/// In-memory loan repository.
#[derive(Clone, Default)]
pub struct InMemoryLoanRepository {
    loans: Arc<RwLock<HashMap<LoanId, Loan>>>,
}

impl InMemoryLoanRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored loans.
    pub async fn count(&self) -> usize {
        self.loans.read().await.len()
    }
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn save(&self, loan: &Loan) -> Result<()> {
        self.loans.write().await.insert(loan.id(), loan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.read().await.get(&id).cloned())
    }

    async fn find_by_member_and_status(
        &self,
        member_id: MemberId,
        status: LoanStatus,
    ) -> Result<Vec<Loan>> {
        let loans = self.loans.read().await;
        let mut found: Vec<_> = loans
            .values()
            .filter(|l| l.member_id() == member_id && l.status() == status)
            .cloned()
            .collect();
        found.sort_by_key(|l| l.due_date());
        Ok(found)
    }

    async fn find_by_book(&self, book_id: BookId) -> Result<Vec<Loan>> {
        let loans = self.loans.read().await;
        let mut found: Vec<_> = loans
            .values()
            .filter(|l| l.book_id() == book_id)
            .cloned()
            .collect();
        found.sort_by_key(|l| l.borrowed_date());
        Ok(found)
    }

    async fn find_by_book_and_status(
        &self,
        book_id: BookId,
        status: LoanStatus,
    ) -> Result<Option<Loan>> {
        let loans = self.loans.read().await;
        Ok(loans
            .values()
            .find(|l| l.book_id() == book_id && l.status() == status)
            .cloned())
    }

    async fn count_by_member_and_status(
        &self,
        member_id: MemberId,
        status: LoanStatus,
    ) -> Result<u64> {
        let loans = self.loans.read().await;
        Ok(loans
            .values()
            .filter(|l| l.member_id() == member_id && l.status() == status)
            .count() as u64)
    }

    async fn find_overdue(&self, as_of: NaiveDate) -> Result<Vec<Loan>> {
        let loans = self.loans.read().await;
        let mut overdue: Vec<_> = loans
            .values()
            .filter(|l| l.is_overdue_as_of(as_of))
            .cloned()
            .collect();
        overdue.sort_by_key(|l| l.due_date());
        Ok(overdue)
    }

    async fn find_due_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Loan>> {
        let loans = self.loans.read().await;
        let mut due: Vec<_> = loans
            .values()
            .filter(|l| {
                l.status() != LoanStatus::Returned
                    && l.due_date() >= start
                    && l.due_date() <= end
            })
            .cloned()
            .collect();
        due.sort_by_key(|l| l.due_date());
        Ok(due)
    }
}
