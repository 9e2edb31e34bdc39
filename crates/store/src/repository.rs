//! Repository traits for the three aggregates.
//!
//! Repositories load and save whole aggregates; nothing smaller crosses
//! this boundary. Each workflow operation is expected to execute against a
//! single repository transaction — the traits stay free of transaction
//! control so implementations can supply it.

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{BookId, LoanId, MemberId};
use domain::{Book, Email, Isbn, Loan, LoanStatus, Member};

use crate::error::Result;

/// Persistence for the book catalog.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Inserts or updates a book.
    async fn save(&self, book: &Book) -> Result<()>;

    /// Loads a book by id.
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// Returns every book in the catalog.
    async fn find_all(&self) -> Result<Vec<Book>>;

    /// Returns the books currently available for borrowing.
    async fn find_available(&self) -> Result<Vec<Book>>;

    /// Case-insensitive partial match on title.
    async fn find_by_title_containing(&self, title: &str) -> Result<Vec<Book>>;

    /// Case-insensitive partial match on author.
    async fn find_by_author_containing(&self, author: &str) -> Result<Vec<Book>>;

    /// Returns true if any book carries the given ISBN.
    async fn exists_by_isbn(&self, isbn: &Isbn) -> Result<bool>;

    /// Loads a book by its (unique) ISBN.
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>>;
}

/// Persistence for members.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Inserts or updates a member.
    async fn save(&self, member: &Member) -> Result<()>;

    /// Loads a member by id.
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>>;

    /// Returns every registered member.
    async fn find_all(&self) -> Result<Vec<Member>>;

    /// Returns the currently active members.
    async fn find_active(&self) -> Result<Vec<Member>>;

    /// Case-insensitive partial match on name.
    async fn find_by_name_containing(&self, name: &str) -> Result<Vec<Member>>;

    /// Returns true if any member uses the given email.
    async fn exists_by_email(&self, email: &Email) -> Result<bool>;

    /// Loads a member by their (unique) email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>>;
}

/// Persistence for the loan aggregate.
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Inserts or updates a loan.
    async fn save(&self, loan: &Loan) -> Result<()>;

    /// Loads a loan by id.
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>>;

    /// All loans of a member with the given status.
    async fn find_by_member_and_status(
        &self,
        member_id: MemberId,
        status: LoanStatus,
    ) -> Result<Vec<Loan>>;

    /// Full loan history of a book.
    async fn find_by_book(&self, book_id: BookId) -> Result<Vec<Loan>>;

    /// The loan of a book with the given status, if any.
    async fn find_by_book_and_status(
        &self,
        book_id: BookId,
        status: LoanStatus,
    ) -> Result<Option<Loan>>;

    /// Number of a member's loans with the given status.
    async fn count_by_member_and_status(
        &self,
        member_id: MemberId,
        status: LoanStatus,
    ) -> Result<u64>;

    /// Unreturned loans whose due date lies strictly before `as_of`,
    /// ordered by due date.
    async fn find_overdue(&self, as_of: NaiveDate) -> Result<Vec<Loan>>;

    /// Unreturned loans due in the inclusive `[start, end]` window,
    /// ordered by due date.
    async fn find_due_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Loan>>;
}
