//! Domain events: immutable, past-tense facts published by the workflow
//! layer for decoupled downstream reactions.

use chrono::NaiveDate;
use common::{BookId, LoanId, MemberId};
use serde::{Deserialize, Serialize};

/// Events that can occur in the lending workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LendingEvent {
    /// A member borrowed a book.
    BookBorrowed(BookBorrowedData),

    /// A borrowed book came back.
    BookReturned(BookReturnedData),

    /// A loan period was extended.
    LoanExtended(LoanExtendedData),

    /// A loan passed its due date without being returned.
    LoanOverdue(LoanOverdueData),
}

impl LendingEvent {
    /// Returns the event type name used in envelopes and sinks.
    pub fn event_type(&self) -> &'static str {
        match self {
            LendingEvent::BookBorrowed(_) => "BookBorrowed",
            LendingEvent::BookReturned(_) => "BookReturned",
            LendingEvent::LoanExtended(_) => "LoanExtended",
            LendingEvent::LoanOverdue(_) => "LoanOverdue",
        }
    }
}

/// Data for the BookBorrowed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookBorrowedData {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub due_date: NaiveDate,
}

/// Data for the BookReturned event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookReturnedData {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub returned_date: NaiveDate,

    /// Whether the loan was overdue at the moment of return. Captured
    /// before the return is recorded, because a returned loan no longer
    /// reports as overdue.
    pub was_overdue: bool,
}

/// Data for the LoanExtended event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanExtendedData {
    pub loan_id: LoanId,
    pub member_id: MemberId,
    pub new_due_date: NaiveDate,
    pub days_extended: i64,
}

/// Data for the LoanOverdue event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOverdueData {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub due_date: NaiveDate,
    pub days_overdue: i64,
}

// Convenience constructors for events
impl LendingEvent {
    /// Creates a BookBorrowed event.
    pub fn book_borrowed(
        loan_id: LoanId,
        book_id: BookId,
        member_id: MemberId,
        due_date: NaiveDate,
    ) -> Self {
        LendingEvent::BookBorrowed(BookBorrowedData {
            loan_id,
            book_id,
            member_id,
            due_date,
        })
    }

    /// Creates a BookReturned event.
    pub fn book_returned(
        loan_id: LoanId,
        book_id: BookId,
        member_id: MemberId,
        returned_date: NaiveDate,
        was_overdue: bool,
    ) -> Self {
        LendingEvent::BookReturned(BookReturnedData {
            loan_id,
            book_id,
            member_id,
            returned_date,
            was_overdue,
        })
    }

    /// Creates a LoanExtended event.
    pub fn loan_extended(
        loan_id: LoanId,
        member_id: MemberId,
        new_due_date: NaiveDate,
        days_extended: i64,
    ) -> Self {
        LendingEvent::LoanExtended(LoanExtendedData {
            loan_id,
            member_id,
            new_due_date,
            days_extended,
        })
    }

    /// Creates a LoanOverdue event.
    pub fn loan_overdue(
        loan_id: LoanId,
        book_id: BookId,
        member_id: MemberId,
        due_date: NaiveDate,
        days_overdue: i64,
    ) -> Self {
        LendingEvent::LoanOverdue(LoanOverdueData {
            loan_id,
            book_id,
            member_id,
            due_date,
            days_overdue,
        })
    }
}
