//! Route handlers.

pub mod books;
pub mod health;
pub mod loans;
pub mod members;
pub mod metrics;

use std::sync::Arc;

use circulation::{BookService, LoanService, MemberService};
use common::ParseIdError;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub books: BookService,
    pub members: MemberService,
    pub loans: LoanService,
}

pub type SharedState = Arc<AppState>;

/// Parses a path segment into a typed identifier.
pub(crate) fn parse_id<T>(id: &str) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = ParseIdError>,
{
    id.parse()
        .map_err(|e: ParseIdError| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
