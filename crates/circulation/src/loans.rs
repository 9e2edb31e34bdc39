//! Loan workflow service: borrow, return, extend, and the read-side
//! queries over loans.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::{BookId, LoanId, MemberId};
use domain::{LateFeeCalculator, LendingEvent, Loan, LoanStatus, Money};
use serde::Serialize;
use store::{BookRepository, EventEnvelope, EventPublisher, LoanRepository, MemberRepository};

use crate::error::{CirculationError, Result};

/// Default cap on a member's simultaneous open loans.
pub const DEFAULT_MAX_ACTIVE_LOANS: u32 = 5;

/// Late-fee summary for one loan.
#[derive(Debug, Clone, Serialize)]
pub struct LateFeeReport {
    pub loan_id: LoanId,
    pub days_overdue: i64,
    pub daily_rate: Money,
    pub total: Money,
}

/// Coordinates the Loan, Book, and Member aggregates.
///
/// Cross-aggregate rules (availability, member standing, the loan limit)
/// are enforced here, in full, before any aggregate is mutated; single-
/// aggregate rules stay inside the aggregates themselves. Atomicity of the
/// resulting writes is delegated to the repository collaborator.
pub struct LoanService {
    loans: Arc<dyn LoanRepository>,
    books: Arc<dyn BookRepository>,
    members: Arc<dyn MemberRepository>,
    publisher: Arc<dyn EventPublisher>,
    fees: LateFeeCalculator,
    max_active_loans: u32,
}

impl LoanService {
    /// Creates a service with the default loan limit.
    pub fn new(
        loans: Arc<dyn LoanRepository>,
        books: Arc<dyn BookRepository>,
        members: Arc<dyn MemberRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self::with_loan_limit(loans, books, members, publisher, DEFAULT_MAX_ACTIVE_LOANS)
    }

    /// Creates a service with a custom loan limit.
    pub fn with_loan_limit(
        loans: Arc<dyn LoanRepository>,
        books: Arc<dyn BookRepository>,
        members: Arc<dyn MemberRepository>,
        publisher: Arc<dyn EventPublisher>,
        max_active_loans: u32,
    ) -> Self {
        Self {
            loans,
            books,
            members,
            publisher,
            fees: LateFeeCalculator::new(),
            max_active_loans,
        }
    }

    /// Borrows a book for a member.
    ///
    /// The book must be available, the member active, and the member's
    /// open-loan count (active plus extended) below the limit. Nothing is
    /// written until every check has passed.
    #[tracing::instrument(skip(self))]
    pub async fn borrow_book(&self, book_id: BookId, member_id: MemberId) -> Result<Loan> {
        let mut book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or(CirculationError::BookNotFound(book_id))?;

        let member = self
            .members
            .find_by_id(member_id)
            .await?
            .ok_or(CirculationError::MemberNotFound(member_id))?;

        if !book.is_available() {
            return Err(CirculationError::BookNotAvailable {
                title: book.title().to_string(),
            });
        }

        if !member.is_active() {
            return Err(CirculationError::MemberNotActive {
                name: member.name().to_string(),
            });
        }

        // Extended loans still occupy a slot; only returns free one up.
        let open_loans = self
            .loans
            .count_by_member_and_status(member_id, LoanStatus::Active)
            .await?
            + self
                .loans
                .count_by_member_and_status(member_id, LoanStatus::Extended)
                .await?;
        if open_loans >= u64::from(self.max_active_loans) {
            return Err(CirculationError::LoanLimitReached {
                limit: self.max_active_loans,
            });
        }

        let loan = Loan::new(LoanId::generate(), book_id, member_id);
        book.mark_unavailable()?;

        self.loans.save(&loan).await?;
        self.books.save(&book).await?;

        self.publish(LendingEvent::book_borrowed(
            loan.id(),
            book_id,
            member_id,
            loan.due_date(),
        ))
        .await;

        metrics::counter!("loans_borrowed_total").increment(1);
        tracing::info!(loan_id = %loan.id(), %book_id, %member_id, "book borrowed");

        Ok(loan)
    }

    /// Returns a borrowed book and frees it for the next member.
    #[tracing::instrument(skip(self))]
    pub async fn return_book(&self, loan_id: LoanId) -> Result<Loan> {
        let mut loan = self
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or(CirculationError::LoanNotFound(loan_id))?;

        let book_id = loan.book_id();
        let mut book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or(CirculationError::BookNotFound(book_id))?;

        // Captured before the return: a returned loan no longer reports
        // overdue.
        let was_overdue = loan.is_overdue();

        let returned_date = loan.return_book()?;
        book.mark_available()?;

        self.loans.save(&loan).await?;
        self.books.save(&book).await?;

        self.publish(LendingEvent::book_returned(
            loan.id(),
            book_id,
            loan.member_id(),
            returned_date,
            was_overdue,
        ))
        .await;

        metrics::counter!("loans_returned_total").increment(1);
        tracing::info!(loan_id = %loan.id(), %book_id, member_id = %loan.member_id(), "book returned");

        Ok(loan)
    }

    /// Extends a loan by the given number of days (1 to 14, once).
    #[tracing::instrument(skip(self))]
    pub async fn extend_loan(&self, loan_id: LoanId, days: i64) -> Result<Loan> {
        let mut loan = self
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or(CirculationError::LoanNotFound(loan_id))?;

        let new_due_date = loan.extend_loan(days)?;

        self.loans.save(&loan).await?;

        self.publish(LendingEvent::loan_extended(
            loan.id(),
            loan.member_id(),
            new_due_date,
            days,
        ))
        .await;

        metrics::counter!("loans_extended_total").increment(1);
        tracing::info!(loan_id = %loan.id(), days, %new_due_date, "loan extended");

        Ok(loan)
    }

    /// Appends a free-text note to a loan.
    #[tracing::instrument(skip(self, note))]
    pub async fn add_note(&self, loan_id: LoanId, note: &str) -> Result<Loan> {
        let mut loan = self
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or(CirculationError::LoanNotFound(loan_id))?;

        loan.add_note(note)?;
        self.loans.save(&loan).await?;
        Ok(loan)
    }

    /// Loads a loan by id.
    pub async fn get_loan(&self, loan_id: LoanId) -> Result<Loan> {
        self.loans
            .find_by_id(loan_id)
            .await?
            .ok_or(CirculationError::LoanNotFound(loan_id))
    }

    /// The member's open loans (active and extended), ordered by due date.
    pub async fn loans_for_member(&self, member_id: MemberId) -> Result<Vec<Loan>> {
        let mut loans = self
            .loans
            .find_by_member_and_status(member_id, LoanStatus::Active)
            .await?;
        loans.extend(
            self.loans
                .find_by_member_and_status(member_id, LoanStatus::Extended)
                .await?,
        );
        loans.sort_by_key(|l| l.due_date());
        Ok(loans)
    }

    /// All loans overdue as of today.
    pub async fn overdue_loans(&self) -> Result<Vec<Loan>> {
        self.overdue_loans_as_of(today()).await
    }

    /// All loans overdue as of the given date.
    pub async fn overdue_loans_as_of(&self, as_of: NaiveDate) -> Result<Vec<Loan>> {
        Ok(self.loans.find_overdue(as_of).await?)
    }

    /// Unreturned loans due in the inclusive window, for reminder runs.
    pub async fn loans_due_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Loan>> {
        Ok(self.loans.find_due_between(start, end).await?)
    }

    /// Late-fee report for an overdue loan, as of today.
    pub async fn late_fee(&self, loan_id: LoanId) -> Result<LateFeeReport> {
        self.late_fee_as_of(loan_id, today()).await
    }

    /// Late-fee report for an overdue loan, as of the given date.
    pub async fn late_fee_as_of(&self, loan_id: LoanId, as_of: NaiveDate) -> Result<LateFeeReport> {
        let loan = self.get_loan(loan_id).await?;
        let total = self.fees.calculate_as_of(&loan, as_of)?;
        let days_overdue = loan.days_overdue_as_of(as_of);

        Ok(LateFeeReport {
            loan_id,
            days_overdue,
            daily_rate: self.fees.daily_rate(days_overdue),
            total,
        })
    }

    /// Publishes one `LoanOverdue` event per overdue loan, as of today.
    ///
    /// This is the sweep a scheduler invokes for reminder fan-out; it does
    /// not change any loan state. Returns the number of events published.
    #[tracing::instrument(skip(self))]
    pub async fn notify_overdue(&self) -> Result<usize> {
        self.notify_overdue_as_of(today()).await
    }

    /// Publishes one `LoanOverdue` event per loan overdue at `as_of`.
    pub async fn notify_overdue_as_of(&self, as_of: NaiveDate) -> Result<usize> {
        let overdue = self.loans.find_overdue(as_of).await?;

        for loan in &overdue {
            self.publish(LendingEvent::loan_overdue(
                loan.id(),
                loan.book_id(),
                loan.member_id(),
                loan.due_date(),
                loan.days_overdue_as_of(as_of),
            ))
            .await;
        }

        if !overdue.is_empty() {
            tracing::info!(count = overdue.len(), %as_of, "overdue notifications published");
        }
        Ok(overdue.len())
    }

    async fn publish(&self, event: LendingEvent) {
        self.publisher.publish(EventEnvelope::from(&event)).await;
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use common::BookId;
    use domain::{
        Address, Book, BookError, DomainError, Email, Isbn, LOAN_PERIOD_DAYS, LoanError, Member,
    };
    use store::{
        InMemoryBookRepository, InMemoryEventPublisher, InMemoryLoanRepository,
        InMemoryMemberRepository,
    };

    use super::*;

    struct Fixture {
        service: LoanService,
        loans: Arc<InMemoryLoanRepository>,
        books: Arc<InMemoryBookRepository>,
        members: Arc<InMemoryMemberRepository>,
        publisher: Arc<InMemoryEventPublisher>,
    }

    fn fixture() -> Fixture {
        let loans = Arc::new(InMemoryLoanRepository::new());
        let books = Arc::new(InMemoryBookRepository::new());
        let members = Arc::new(InMemoryMemberRepository::new());
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let service = LoanService::new(
            loans.clone(),
            books.clone(),
            members.clone(),
            publisher.clone(),
        );
        Fixture {
            service,
            loans,
            books,
            members,
            publisher,
        }
    }

    async fn seed_book(fx: &Fixture) -> Book {
        let book = Book::new(
            BookId::generate(),
            Isbn::new("9780134685991").unwrap(),
            "Effective Java",
            "Joshua Bloch",
        )
        .unwrap();
        fx.books.save(&book).await.unwrap();
        book
    }

    async fn seed_member(fx: &Fixture) -> Member {
        let member = Member::new(
            MemberId::generate(),
            "Alice Janssens",
            Email::new("alice@example.com").unwrap(),
            Address::new("Naamsestraat 1", "Leuven", "3000", "Belgium").unwrap(),
        )
        .unwrap();
        fx.members.save(&member).await.unwrap();
        member
    }

    async fn seed_open_loans(fx: &Fixture, member_id: MemberId, count: usize) {
        for _ in 0..count {
            let loan = Loan::new(LoanId::generate(), BookId::generate(), member_id);
            fx.loans.save(&loan).await.unwrap();
        }
    }

    #[tokio::test]
    async fn borrow_creates_loan_and_flips_availability() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;

        let loan = fx.service.borrow_book(book.id(), member.id()).await.unwrap();

        assert_eq!(loan.book_id(), book.id());
        assert_eq!(loan.member_id(), member.id());
        assert_eq!(loan.status(), LoanStatus::Active);

        let stored_book = fx.books.find_by_id(book.id()).await.unwrap().unwrap();
        assert!(!stored_book.is_available());
        assert!(fx.loans.find_by_id(loan.id()).await.unwrap().is_some());

        assert_eq!(fx.publisher.event_types().await, vec!["BookBorrowed"]);
    }

    #[tokio::test]
    async fn borrow_unavailable_book_leaves_no_trace() {
        let fx = fixture();
        let mut book = seed_book(&fx).await;
        book.mark_unavailable().unwrap();
        fx.books.save(&book).await.unwrap();
        let member = seed_member(&fx).await;

        let result = fx.service.borrow_book(book.id(), member.id()).await;

        assert!(matches!(
            result,
            Err(CirculationError::BookNotAvailable { .. })
        ));
        // No partial writes: no loan created, no event published.
        assert_eq!(fx.loans.count().await, 0);
        assert_eq!(fx.publisher.count().await, 0);
    }

    #[tokio::test]
    async fn borrow_by_inactive_member_is_rejected() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let mut member = seed_member(&fx).await;
        member.deactivate().unwrap();
        fx.members.save(&member).await.unwrap();

        let result = fx.service.borrow_book(book.id(), member.id()).await;

        assert!(matches!(
            result,
            Err(CirculationError::MemberNotActive { .. })
        ));
        assert_eq!(fx.loans.count().await, 0);
        let stored_book = fx.books.find_by_id(book.id()).await.unwrap().unwrap();
        assert!(stored_book.is_available());
    }

    #[tokio::test]
    async fn borrow_unknown_book_or_member_fails() {
        let fx = fixture();
        let member = seed_member(&fx).await;
        let result = fx.service.borrow_book(BookId::generate(), member.id()).await;
        assert!(matches!(result, Err(CirculationError::BookNotFound(_))));

        let book = seed_book(&fx).await;
        let result = fx
            .service
            .borrow_book(book.id(), MemberId::generate())
            .await;
        assert!(matches!(result, Err(CirculationError::MemberNotFound(_))));
    }

    #[tokio::test]
    async fn fifth_open_loan_blocks_the_sixth() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        seed_open_loans(&fx, member.id(), 5).await;

        let result = fx.service.borrow_book(book.id(), member.id()).await;
        assert!(matches!(
            result,
            Err(CirculationError::LoanLimitReached { limit: 5 })
        ));
    }

    #[tokio::test]
    async fn four_open_loans_still_allow_borrowing() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        seed_open_loans(&fx, member.id(), 4).await;

        assert!(fx.service.borrow_book(book.id(), member.id()).await.is_ok());
    }

    #[tokio::test]
    async fn extended_loans_count_toward_the_limit() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        seed_open_loans(&fx, member.id(), 4).await;

        let mut extended = Loan::new(LoanId::generate(), BookId::generate(), member.id());
        extended.extend_loan(7).unwrap();
        fx.loans.save(&extended).await.unwrap();

        let result = fx.service.borrow_book(book.id(), member.id()).await;
        assert!(matches!(
            result,
            Err(CirculationError::LoanLimitReached { .. })
        ));
    }

    #[tokio::test]
    async fn custom_loan_limit_is_respected() {
        let fx = fixture();
        let service = LoanService::with_loan_limit(
            fx.loans.clone(),
            fx.books.clone(),
            fx.members.clone(),
            fx.publisher.clone(),
            1,
        );
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        seed_open_loans(&fx, member.id(), 1).await;

        let result = service.borrow_book(book.id(), member.id()).await;
        assert!(matches!(
            result,
            Err(CirculationError::LoanLimitReached { limit: 1 })
        ));
    }

    #[tokio::test]
    async fn return_frees_book_and_reports_event() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        let loan = fx.service.borrow_book(book.id(), member.id()).await.unwrap();

        let returned = fx.service.return_book(loan.id()).await.unwrap();

        assert_eq!(returned.status(), LoanStatus::Returned);
        assert!(returned.returned_date().is_some());

        let stored_book = fx.books.find_by_id(book.id()).await.unwrap().unwrap();
        assert!(stored_book.is_available());

        assert_eq!(
            fx.publisher.event_types().await,
            vec!["BookBorrowed", "BookReturned"]
        );
        let envelopes = fx.publisher.published().await;
        assert_eq!(envelopes[1].payload["was_overdue"], false);
    }

    #[tokio::test]
    async fn returning_twice_fails_with_state_error() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        let loan = fx.service.borrow_book(book.id(), member.id()).await.unwrap();

        fx.service.return_book(loan.id()).await.unwrap();
        let result = fx.service.return_book(loan.id()).await;

        assert!(matches!(
            result,
            Err(CirculationError::Domain(DomainError::Loan(
                LoanError::AlreadyReturned
            )))
        ));
    }

    #[tokio::test]
    async fn overdue_return_captures_flag_before_mutation() {
        let fx = fixture();
        let member = seed_member(&fx).await;
        let mut book = seed_book(&fx).await;
        book.mark_unavailable().unwrap();
        fx.books.save(&book).await.unwrap();

        // Loan that went out 40 days ago, due 10 days ago.
        let loan = Loan::new_on(
            LoanId::generate(),
            book.id(),
            member.id(),
            Utc::now().date_naive() - Days::new(LOAN_PERIOD_DAYS + 10),
        );
        fx.loans.save(&loan).await.unwrap();

        fx.service.return_book(loan.id()).await.unwrap();

        let envelopes = fx.publisher.published().await;
        assert_eq!(envelopes[0].event_type, "BookReturned");
        assert_eq!(envelopes[0].payload["was_overdue"], true);
    }

    #[tokio::test]
    async fn extend_advances_due_date_and_publishes() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        let loan = fx.service.borrow_book(book.id(), member.id()).await.unwrap();

        let extended = fx.service.extend_loan(loan.id(), 5).await.unwrap();

        assert_eq!(extended.status(), LoanStatus::Extended);
        assert_eq!(extended.due_date(), loan.due_date() + Days::new(5));

        let envelopes = fx.publisher.published().await;
        assert_eq!(envelopes[1].event_type, "LoanExtended");
        assert_eq!(envelopes[1].payload["days_extended"], 5);

        // A second extension propagates the aggregate's rejection.
        let result = fx.service.extend_loan(loan.id(), 3).await;
        assert!(matches!(
            result,
            Err(CirculationError::Domain(DomainError::Loan(
                LoanError::AlreadyExtended
            )))
        ));
    }

    #[tokio::test]
    async fn extend_with_out_of_range_days_fails() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        let loan = fx.service.borrow_book(book.id(), member.id()).await.unwrap();

        let result = fx.service.extend_loan(loan.id(), 15).await;
        assert!(matches!(
            result,
            Err(CirculationError::Domain(DomainError::Loan(
                LoanError::InvalidExtensionDays { days: 15 }
            )))
        ));
    }

    #[tokio::test]
    async fn loans_for_member_includes_extended() {
        let fx = fixture();
        let member = seed_member(&fx).await;
        seed_open_loans(&fx, member.id(), 2).await;
        let mut extended = Loan::new(LoanId::generate(), BookId::generate(), member.id());
        extended.extend_loan(7).unwrap();
        fx.loans.save(&extended).await.unwrap();
        let mut returned = Loan::new(LoanId::generate(), BookId::generate(), member.id());
        returned.return_book().unwrap();
        fx.loans.save(&returned).await.unwrap();

        let loans = fx.service.loans_for_member(member.id()).await.unwrap();
        assert_eq!(loans.len(), 3);
        assert!(loans.iter().all(|l| l.status().is_open()));
    }

    #[tokio::test]
    async fn late_fee_report_for_ten_days_overdue() {
        let fx = fixture();
        let member = seed_member(&fx).await;
        let loan = Loan::new_on(
            LoanId::generate(),
            BookId::generate(),
            member.id(),
            Utc::now().date_naive() - Days::new(LOAN_PERIOD_DAYS + 10),
        );
        fx.loans.save(&loan).await.unwrap();

        let report = fx.service.late_fee(loan.id()).await.unwrap();

        assert_eq!(report.days_overdue, 10);
        assert_eq!(report.total, Money::eur(650));
        assert_eq!(report.daily_rate, Money::eur(100));
    }

    #[tokio::test]
    async fn late_fee_for_current_loan_is_rejected() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        let loan = fx.service.borrow_book(book.id(), member.id()).await.unwrap();

        let result = fx.service.late_fee(loan.id()).await;
        assert!(matches!(
            result,
            Err(CirculationError::Domain(DomainError::Loan(
                LoanError::NotOverdue
            )))
        ));
    }

    #[tokio::test]
    async fn notify_overdue_publishes_one_event_per_loan() {
        let fx = fixture();
        let member = seed_member(&fx).await;
        for days_late in [3, 12] {
            let loan = Loan::new_on(
                LoanId::generate(),
                BookId::generate(),
                member.id(),
                Utc::now().date_naive() - Days::new(LOAN_PERIOD_DAYS + days_late),
            );
            fx.loans.save(&loan).await.unwrap();
        }
        seed_open_loans(&fx, member.id(), 1).await; // not overdue

        let count = fx.service.notify_overdue().await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fx.publisher.event_types().await,
            vec!["LoanOverdue", "LoanOverdue"]
        );
        let envelopes = fx.publisher.published().await;
        assert_eq!(envelopes[0].payload["days_overdue"], 12);
        assert_eq!(envelopes[1].payload["days_overdue"], 3);
    }

    #[tokio::test]
    async fn add_note_appends() {
        let fx = fixture();
        let book = seed_book(&fx).await;
        let member = seed_member(&fx).await;
        let loan = fx.service.borrow_book(book.id(), member.id()).await.unwrap();

        fx.service.add_note(loan.id(), "Dust jacket missing").await.unwrap();
        let updated = fx.service.add_note(loan.id(), "Member notified").await.unwrap();

        assert_eq!(updated.notes(), Some("Dust jacket missing\nMember notified"));
    }

    #[tokio::test]
    async fn failed_mark_available_surfaces_book_state_error() {
        let fx = fixture();
        let member = seed_member(&fx).await;
        let book = seed_book(&fx).await; // still marked available

        // Loan exists although the book was never flipped; returning now
        // trips the book's own no-op guard.
        let loan = Loan::new(LoanId::generate(), book.id(), member.id());
        fx.loans.save(&loan).await.unwrap();

        let result = fx.service.return_book(loan.id()).await;
        assert!(matches!(
            result,
            Err(CirculationError::Domain(DomainError::Book(
                BookError::AlreadyAvailable
            )))
        ));
    }
}
