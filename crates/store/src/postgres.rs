//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{BookId, LoanId, MemberId};
use domain::{Address, Book, Email, Isbn, Loan, LoanStatus, Member};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::repository::{BookRepository, LoanRepository, MemberRepository};

/// Runs the database migrations for the lending schema.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

fn corrupt(e: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(e.to_string())
}

fn row_to_book(row: &PgRow) -> Result<Book> {
    let isbn = Isbn::new(row.try_get::<&str, _>("isbn")?).map_err(corrupt)?;
    Book::restore(
        BookId::from_uuid(row.try_get::<Uuid, _>("id")?),
        isbn,
        row.try_get::<String, _>("title")?,
        row.try_get::<String, _>("author")?,
        row.try_get("available")?,
    )
    .map_err(corrupt)
}

fn row_to_member(row: &PgRow) -> Result<Member> {
    let email = Email::new(row.try_get::<&str, _>("email")?).map_err(corrupt)?;
    let address = Address::new(
        row.try_get::<String, _>("address_street")?,
        row.try_get::<String, _>("address_city")?,
        row.try_get::<String, _>("address_postal_code")?,
        row.try_get::<String, _>("address_country")?,
    )
    .map_err(corrupt)?;

    Member::restore(
        MemberId::from_uuid(row.try_get::<Uuid, _>("id")?),
        row.try_get::<String, _>("name")?,
        email,
        address,
        row.try_get("member_since")?,
        row.try_get("active")?,
    )
    .map_err(corrupt)
}

fn row_to_loan(row: &PgRow) -> Result<Loan> {
    let status: LoanStatus = row
        .try_get::<&str, _>("status")?
        .parse()
        .map_err(corrupt)?;

    Loan::restore(
        LoanId::from_uuid(row.try_get::<Uuid, _>("id")?),
        BookId::from_uuid(row.try_get::<Uuid, _>("book_id")?),
        MemberId::from_uuid(row.try_get::<Uuid, _>("member_id")?),
        row.try_get("borrowed_date")?,
        row.try_get("due_date")?,
        row.try_get("returned_date")?,
        status,
        row.try_get("notes")?,
    )
    .map_err(corrupt)
}

/// PostgreSQL-backed book repository.
#[derive(Clone)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    /// Creates a new repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn save(&self, book: &Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, isbn, title, author, available)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET isbn = EXCLUDED.isbn,
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                available = EXCLUDED.available
            "#,
        )
        .bind(book.id().as_uuid())
        .bind(book.isbn().as_str())
        .bind(book.title())
        .bind(book.author())
        .bind(book.is_available())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT * FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_book).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_book).collect()
    }

    async fn find_available(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query("SELECT * FROM books WHERE available ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_book).collect()
    }

    async fn find_by_title_containing(&self, title: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            "SELECT * FROM books WHERE title ILIKE '%' || $1 || '%' ORDER BY title",
        )
        .bind(title)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_book).collect()
    }

    async fn find_by_author_containing(&self, author: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            "SELECT * FROM books WHERE author ILIKE '%' || $1 || '%' ORDER BY title",
        )
        .bind(author)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_book).collect()
    }

    async fn exists_by_isbn(&self, isbn: &Isbn) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_book).transpose()
    }
}

/// PostgreSQL-backed member repository.
#[derive(Clone)]
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    /// Creates a new repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn save(&self, member: &Member) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO members (
                id, name, email,
                address_street, address_city, address_postal_code, address_country,
                member_since, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                address_street = EXCLUDED.address_street,
                address_city = EXCLUDED.address_city,
                address_postal_code = EXCLUDED.address_postal_code,
                address_country = EXCLUDED.address_country,
                member_since = EXCLUDED.member_since,
                active = EXCLUDED.active
            "#,
        )
        .bind(member.id().as_uuid())
        .bind(member.name())
        .bind(member.email().as_str())
        .bind(member.address().street())
        .bind(member.address().city())
        .bind(member.address().postal_code())
        .bind(member.address().country())
        .bind(member.member_since())
        .bind(member.is_active())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query("SELECT * FROM members WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_member).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query("SELECT * FROM members ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_member).collect()
    }

    async fn find_active(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query("SELECT * FROM members WHERE active ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_member).collect()
    }

    async fn find_by_name_containing(&self, name: &str) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            "SELECT * FROM members WHERE name ILIKE '%' || $1 || '%' ORDER BY name",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_member).collect()
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>> {
        let row = sqlx::query("SELECT * FROM members WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_member).transpose()
    }
}

/// PostgreSQL-backed loan repository.
#[derive(Clone)]
pub struct PostgresLoanRepository {
    pool: PgPool,
}

impl PostgresLoanRepository {
    /// Creates a new repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepository for PostgresLoanRepository {
    async fn save(&self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (
                id, book_id, member_id,
                borrowed_date, due_date, returned_date,
                status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET book_id = EXCLUDED.book_id,
                member_id = EXCLUDED.member_id,
                borrowed_date = EXCLUDED.borrowed_date,
                due_date = EXCLUDED.due_date,
                returned_date = EXCLUDED.returned_date,
                status = EXCLUDED.status,
                notes = EXCLUDED.notes
            "#,
        )
        .bind(loan.id().as_uuid())
        .bind(loan.book_id().as_uuid())
        .bind(loan.member_id().as_uuid())
        .bind(loan.borrowed_date())
        .bind(loan.due_date())
        .bind(loan.returned_date())
        .bind(loan.status().as_str())
        .bind(loan.notes())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query("SELECT * FROM loans WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_loan).transpose()
    }

    async fn find_by_member_and_status(
        &self,
        member_id: MemberId,
        status: LoanStatus,
    ) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            "SELECT * FROM loans WHERE member_id = $1 AND status = $2 ORDER BY due_date",
        )
        .bind(member_id.as_uuid())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_loan).collect()
    }

    async fn find_by_book(&self, book_id: BookId) -> Result<Vec<Loan>> {
        let rows = sqlx::query("SELECT * FROM loans WHERE book_id = $1 ORDER BY borrowed_date")
            .bind(book_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_loan).collect()
    }

    async fn find_by_book_and_status(
        &self,
        book_id: BookId,
        status: LoanStatus,
    ) -> Result<Option<Loan>> {
        let row = sqlx::query("SELECT * FROM loans WHERE book_id = $1 AND status = $2")
            .bind(book_id.as_uuid())
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_loan).transpose()
    }

    async fn count_by_member_and_status(
        &self,
        member_id: MemberId,
        status: LoanStatus,
    ) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE member_id = $1 AND status = $2")
                .bind(member_id.as_uuid())
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }

    async fn find_overdue(&self, as_of: NaiveDate) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            "SELECT * FROM loans WHERE due_date < $1 AND status != $2 ORDER BY due_date",
        )
        .bind(as_of)
        .bind(LoanStatus::Returned.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_loan).collect()
    }

    async fn find_due_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM loans
            WHERE due_date BETWEEN $1 AND $2 AND status != $3
            ORDER BY due_date
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(LoanStatus::Returned.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_loan).collect()
    }
}
