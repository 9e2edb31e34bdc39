//! Loan aggregate root.

use chrono::{Days, NaiveDate, Utc};
use common::{BookId, LoanId, MemberId};

use super::{LoanError, LoanStatus};

/// Default loan period in days.
pub const LOAN_PERIOD_DAYS: u64 = 30;

/// Maximum length of a single extension, in days.
const MAX_EXTENSION_DAYS: i64 = 14;

/// A loan of one book to one member.
///
/// The loan is the aggregate root and the only entry point for loan state.
/// It references the book and member by id only — it never holds the
/// entities themselves, so it cannot reach across aggregate boundaries to
/// mutate them. Cross-aggregate coordination happens in the workflow layer.
#[derive(Debug, Clone)]
pub struct Loan {
    id: LoanId,
    book_id: BookId,
    member_id: MemberId,
    borrowed_date: NaiveDate,
    due_date: NaiveDate,
    returned_date: Option<NaiveDate>,
    status: LoanStatus,
    notes: Option<String>,
}

impl Loan {
    /// Creates a new loan starting today, due in [`LOAN_PERIOD_DAYS`] days.
    pub fn new(id: LoanId, book_id: BookId, member_id: MemberId) -> Self {
        Self::new_on(id, book_id, member_id, today())
    }

    /// Creates a new loan with an explicit start date.
    pub fn new_on(
        id: LoanId,
        book_id: BookId,
        member_id: MemberId,
        borrowed_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            book_id,
            member_id,
            borrowed_date,
            due_date: borrowed_date + Days::new(LOAN_PERIOD_DAYS),
            returned_date: None,
            status: LoanStatus::Active,
            notes: None,
        }
    }

    /// Rebuilds a loan from persisted state, checking invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: LoanId,
        book_id: BookId,
        member_id: MemberId,
        borrowed_date: NaiveDate,
        due_date: NaiveDate,
        returned_date: Option<NaiveDate>,
        status: LoanStatus,
        notes: Option<String>,
    ) -> Result<Self, LoanError> {
        if due_date < borrowed_date {
            return Err(LoanError::DueDateBeforeBorrowed {
                borrowed_date,
                due_date,
            });
        }
        if returned_date.is_some() != (status == LoanStatus::Returned) {
            return Err(LoanError::ReturnedDateMismatch);
        }

        Ok(Self {
            id,
            book_id,
            member_id,
            borrowed_date,
            due_date,
            returned_date,
            status,
            notes,
        })
    }

    /// Records the return of the book, ending the loan.
    ///
    /// Fails if the loan is already returned; the check is repeated on
    /// every call, so a second return always errors. Returns the date
    /// recorded.
    pub fn return_book(&mut self) -> Result<NaiveDate, LoanError> {
        if self.status == LoanStatus::Returned {
            return Err(LoanError::AlreadyReturned);
        }

        let returned = today();
        self.returned_date = Some(returned);
        self.status = LoanStatus::Returned;
        Ok(returned)
    }

    /// Extends the loan period by `days` (1 to 14).
    ///
    /// Allowed at most once per loan. Returns the new due date.
    pub fn extend_loan(&mut self, days: i64) -> Result<NaiveDate, LoanError> {
        if self.status == LoanStatus::Returned {
            return Err(LoanError::CannotExtendReturned);
        }
        if self.status == LoanStatus::Extended {
            return Err(LoanError::AlreadyExtended);
        }
        if days < 1 || days > MAX_EXTENSION_DAYS {
            return Err(LoanError::InvalidExtensionDays { days });
        }

        self.due_date = self.due_date + Days::new(days as u64);
        self.status = LoanStatus::Extended;
        Ok(self.due_date)
    }

    /// Returns true if the loan is overdue as of today.
    ///
    /// Overdueness is derived from the due date on every call; it is never
    /// stored as a status.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_as_of(today())
    }

    /// Returns true if the loan is overdue as of the given date.
    pub fn is_overdue_as_of(&self, as_of: NaiveDate) -> bool {
        self.status != LoanStatus::Returned && as_of > self.due_date
    }

    /// Number of days overdue as of today, zero if not overdue.
    pub fn days_overdue(&self) -> i64 {
        self.days_overdue_as_of(today())
    }

    /// Number of days overdue as of the given date, zero if not overdue.
    pub fn days_overdue_as_of(&self, as_of: NaiveDate) -> i64 {
        if !self.is_overdue_as_of(as_of) {
            return 0;
        }
        (as_of - self.due_date).num_days()
    }

    /// Appends a note, newline-separated from any existing notes.
    pub fn add_note(&mut self, note: &str) -> Result<(), LoanError> {
        if note.trim().is_empty() {
            return Err(LoanError::EmptyNote);
        }

        match &mut self.notes {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(note);
            }
            None => self.notes = Some(note.to_string()),
        }
        Ok(())
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn borrowed_date(&self) -> NaiveDate {
        self.borrowed_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn returned_date(&self) -> Option<NaiveDate> {
        self.returned_date
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

// Aggregates are equal iff they share an identity.
impl PartialEq for Loan {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Loan {}

impl std::fmt::Display for Loan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Loan[id={}, bookId={}, memberId={}, status={}, dueDate={}]",
            self.id, self.book_id, self.member_id, self.status, self.due_date
        )
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_loan() -> Loan {
        Loan::new(LoanId::generate(), BookId::generate(), MemberId::generate())
    }

    fn backdated_loan(days_past_due: u64) -> Loan {
        let borrowed = today() - Days::new(LOAN_PERIOD_DAYS + days_past_due);
        Loan::new_on(
            LoanId::generate(),
            BookId::generate(),
            MemberId::generate(),
            borrowed,
        )
    }

    #[test]
    fn new_loan_is_active_with_thirty_day_period() {
        let loan = new_loan();
        assert_eq!(loan.status(), LoanStatus::Active);
        assert_eq!(loan.borrowed_date(), today());
        assert_eq!(loan.due_date(), today() + Days::new(30));
        assert_eq!(loan.returned_date(), None);
    }

    #[test]
    fn return_sets_date_and_status() {
        let mut loan = new_loan();
        let returned = loan.return_book().unwrap();
        assert_eq!(loan.status(), LoanStatus::Returned);
        assert_eq!(loan.returned_date(), Some(returned));
        assert_eq!(returned, today());
    }

    #[test]
    fn second_return_fails() {
        let mut loan = new_loan();
        loan.return_book().unwrap();
        assert_eq!(loan.return_book(), Err(LoanError::AlreadyReturned));
    }

    #[test]
    fn extend_advances_due_date_once() {
        let mut loan = new_loan();
        let new_due = loan.extend_loan(5).unwrap();
        assert_eq!(new_due, today() + Days::new(35));
        assert_eq!(loan.due_date(), new_due);
        assert_eq!(loan.status(), LoanStatus::Extended);
    }

    #[test]
    fn second_extension_fails_regardless_of_days() {
        let mut loan = new_loan();
        loan.extend_loan(5).unwrap();
        assert_eq!(loan.extend_loan(1), Err(LoanError::AlreadyExtended));
    }

    #[test]
    fn extension_outside_one_to_fourteen_fails() {
        let mut loan = new_loan();
        assert_eq!(
            loan.extend_loan(15),
            Err(LoanError::InvalidExtensionDays { days: 15 })
        );
        assert_eq!(
            loan.extend_loan(0),
            Err(LoanError::InvalidExtensionDays { days: 0 })
        );
        assert_eq!(
            loan.extend_loan(-3),
            Err(LoanError::InvalidExtensionDays { days: -3 })
        );
        // The failed attempts must not have moved the due date.
        assert_eq!(loan.due_date(), today() + Days::new(30));
        assert_eq!(loan.status(), LoanStatus::Active);
    }

    #[test]
    fn cannot_extend_returned_loan() {
        let mut loan = new_loan();
        loan.return_book().unwrap();
        assert_eq!(loan.extend_loan(5), Err(LoanError::CannotExtendReturned));
    }

    #[test]
    fn fresh_loan_is_not_overdue() {
        let loan = new_loan();
        assert!(!loan.is_overdue());
        assert_eq!(loan.days_overdue(), 0);
    }

    #[test]
    fn overdue_is_derived_from_due_date() {
        let loan = backdated_loan(10);
        assert!(loan.is_overdue());
        assert_eq!(loan.days_overdue(), 10);
    }

    #[test]
    fn due_date_itself_is_not_overdue() {
        let loan = new_loan();
        assert!(!loan.is_overdue_as_of(loan.due_date()));
        assert!(loan.is_overdue_as_of(loan.due_date() + Days::new(1)));
    }

    #[test]
    fn returned_loan_is_never_overdue() {
        let mut loan = backdated_loan(10);
        assert!(loan.is_overdue());
        loan.return_book().unwrap();
        assert!(!loan.is_overdue());
        assert_eq!(loan.days_overdue(), 0);
    }

    #[test]
    fn notes_are_newline_joined() {
        let mut loan = new_loan();
        assert_eq!(loan.notes(), None);
        loan.add_note("Cover slightly damaged").unwrap();
        loan.add_note("Member notified").unwrap();
        assert_eq!(
            loan.notes(),
            Some("Cover slightly damaged\nMember notified")
        );
    }

    #[test]
    fn blank_note_is_rejected() {
        let mut loan = new_loan();
        assert_eq!(loan.add_note("   "), Err(LoanError::EmptyNote));
        assert_eq!(loan.notes(), None);
    }

    #[test]
    fn restore_checks_date_ordering() {
        let borrowed = today();
        let result = Loan::restore(
            LoanId::generate(),
            BookId::generate(),
            MemberId::generate(),
            borrowed,
            borrowed - Days::new(1),
            None,
            LoanStatus::Active,
            None,
        );
        assert!(matches!(
            result,
            Err(LoanError::DueDateBeforeBorrowed { .. })
        ));
    }

    #[test]
    fn restore_checks_returned_date_consistency() {
        let borrowed = today() - Days::new(40);
        let result = Loan::restore(
            LoanId::generate(),
            BookId::generate(),
            MemberId::generate(),
            borrowed,
            borrowed + Days::new(30),
            Some(today()),
            LoanStatus::Active,
            None,
        );
        assert_eq!(result, Err(LoanError::ReturnedDateMismatch));

        let result = Loan::restore(
            LoanId::generate(),
            BookId::generate(),
            MemberId::generate(),
            borrowed,
            borrowed + Days::new(30),
            None,
            LoanStatus::Returned,
            None,
        );
        assert_eq!(result, Err(LoanError::ReturnedDateMismatch));
    }

    #[test]
    fn extend_then_return() {
        let mut loan = new_loan();
        loan.extend_loan(14).unwrap();
        loan.return_book().unwrap();
        assert_eq!(loan.status(), LoanStatus::Returned);
        assert_eq!(loan.extend_loan(1), Err(LoanError::CannotExtendReturned));
    }
}
