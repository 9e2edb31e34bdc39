//! Loan workflow endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use circulation::LateFeeReport;
use common::{BookId, LoanId, MemberId};
use domain::Loan;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

use super::{SharedState, parse_id};

// -- Request types --

#[derive(Deserialize)]
pub struct BorrowBookRequest {
    pub book_id: String,
    pub member_id: String,
}

#[derive(Deserialize)]
pub struct ExtendLoanRequest {
    pub days: i64,
}

#[derive(Deserialize)]
pub struct AddNoteRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DueWindowQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// -- Response types --

#[derive(Serialize)]
pub struct LoanResponse {
    pub id: String,
    pub book_id: String,
    pub member_id: String,
    pub borrowed_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_date: Option<NaiveDate>,
    pub status: String,
    pub overdue: bool,
    pub days_overdue: i64,
}

impl LoanResponse {
    fn from_loan(loan: &Loan) -> Self {
        Self {
            id: loan.id().to_string(),
            book_id: loan.book_id().to_string(),
            member_id: loan.member_id().to_string(),
            borrowed_date: loan.borrowed_date(),
            due_date: loan.due_date(),
            returned_date: loan.returned_date(),
            status: loan.status().to_string(),
            overdue: loan.is_overdue(),
            days_overdue: loan.days_overdue(),
        }
    }
}

#[derive(Serialize)]
pub struct LateFeeResponse {
    pub loan_id: String,
    pub days_overdue: i64,
    pub daily_rate_cents: u64,
    pub total_cents: u64,
    pub currency: String,
}

impl LateFeeResponse {
    fn from_report(report: &LateFeeReport) -> Self {
        Self {
            loan_id: report.loan_id.to_string(),
            days_overdue: report.days_overdue,
            daily_rate_cents: report.daily_rate.cents(),
            total_cents: report.total.cents(),
            currency: report.total.currency().to_string(),
        }
    }
}

// -- Handlers --

/// POST /api/loans/borrow — borrow a book for a member.
#[tracing::instrument(skip(state, req))]
pub async fn borrow(
    State(state): State<SharedState>,
    Json(req): Json<BorrowBookRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let book_id: BookId = parse_id(&req.book_id)?;
    let member_id: MemberId = parse_id(&req.member_id)?;

    let loan = state.loans.borrow_book(book_id, member_id).await?;
    Ok((StatusCode::CREATED, Json(LoanResponse::from_loan(&loan))))
}

/// GET /api/loans/{id} — load one loan.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan_id: LoanId = parse_id(&id)?;
    let loan = state.loans.get_loan(loan_id).await?;
    Ok(Json(LoanResponse::from_loan(&loan)))
}

/// POST /api/loans/{id}/return — return a borrowed book.
#[tracing::instrument(skip(state))]
pub async fn return_book(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan_id: LoanId = parse_id(&id)?;
    let loan = state.loans.return_book(loan_id).await?;
    Ok(Json(LoanResponse::from_loan(&loan)))
}

/// POST /api/loans/{id}/extend — extend a loan by a number of days.
#[tracing::instrument(skip(state, req))]
pub async fn extend(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<ExtendLoanRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan_id: LoanId = parse_id(&id)?;
    let loan = state.loans.extend_loan(loan_id, req.days).await?;
    Ok(Json(LoanResponse::from_loan(&loan)))
}

/// POST /api/loans/{id}/notes — append a note to a loan.
#[tracing::instrument(skip(state, req))]
pub async fn add_note(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<AddNoteRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan_id: LoanId = parse_id(&id)?;
    let loan = state.loans.add_note(loan_id, &req.text).await?;
    Ok(Json(LoanResponse::from_loan(&loan)))
}

/// GET /api/loans/member/{member_id} — the member's open loans.
#[tracing::instrument(skip(state))]
pub async fn by_member(
    State(state): State<SharedState>,
    Path(member_id): Path<String>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let member_id: MemberId = parse_id(&member_id)?;
    let loans = state.loans.loans_for_member(member_id).await?;
    Ok(Json(loans.iter().map(LoanResponse::from_loan).collect()))
}

/// GET /api/loans/overdue — every loan past its due date.
#[tracing::instrument(skip(state))]
pub async fn overdue(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = state.loans.overdue_loans().await?;
    Ok(Json(loans.iter().map(LoanResponse::from_loan).collect()))
}

/// GET /api/loans/due?start=&end= — loans due in the window, for
/// reminder runs.
#[tracing::instrument(skip(state))]
pub async fn due_between(
    State(state): State<SharedState>,
    Query(window): Query<DueWindowQuery>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = state
        .loans
        .loans_due_between(window.start, window.end)
        .await?;
    Ok(Json(loans.iter().map(LoanResponse::from_loan).collect()))
}

/// GET /api/loans/{id}/late-fee — late-fee report for an overdue loan.
#[tracing::instrument(skip(state))]
pub async fn late_fee(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<LateFeeResponse>, ApiError> {
    let loan_id: LoanId = parse_id(&id)?;
    let report = state.loans.late_fee(loan_id).await?;
    Ok(Json(LateFeeResponse::from_report(&report)))
}
