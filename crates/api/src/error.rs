//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use circulation::CirculationError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Workflow or domain error.
    Workflow(CirculationError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Workflow(err) => workflow_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Maps workflow errors onto status codes: missing aggregates are 404,
/// validation failures 400, state conflicts 409, store failures 500.
fn workflow_error_to_response(err: CirculationError) -> (StatusCode, String) {
    match &err {
        CirculationError::BookNotFound(_)
        | CirculationError::MemberNotFound(_)
        | CirculationError::LoanNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),

        CirculationError::BookNotAvailable { .. }
        | CirculationError::MemberNotActive { .. }
        | CirculationError::LoanLimitReached { .. } => (StatusCode::CONFLICT, err.to_string()),

        CirculationError::DuplicateIsbn(_) | CirculationError::DuplicateEmail(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }

        CirculationError::Domain(domain_err) => {
            if domain_err.is_validation() {
                (StatusCode::BAD_REQUEST, err.to_string())
            } else {
                (StatusCode::CONFLICT, err.to_string())
            }
        }

        CirculationError::Store(store_err) => {
            tracing::error!(error = %store_err, "store error");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<CirculationError> for ApiError {
    fn from(err: CirculationError) -> Self {
        ApiError::Workflow(err)
    }
}
