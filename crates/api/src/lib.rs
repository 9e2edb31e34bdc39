//! HTTP API server with observability for the library lending system.
//!
//! Provides REST endpoints for the catalog, membership, and loan
//! workflows, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use circulation::{BookService, LoanService, MemberService};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{
    InMemoryBookRepository, InMemoryLoanRepository, InMemoryMemberRepository,
    TracingEventPublisher,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/books", post(routes::books::create))
        .route("/api/books", get(routes::books::list))
        .route("/api/books/available", get(routes::books::available))
        .route("/api/books/search/title", get(routes::books::search_title))
        .route("/api/books/search/author", get(routes::books::search_author))
        .route("/api/books/{id}", get(routes::books::get))
        .route("/api/books/{id}/title", put(routes::books::rename))
        .route("/api/members", post(routes::members::create))
        .route("/api/members", get(routes::members::list))
        .route("/api/members/active", get(routes::members::active))
        .route("/api/members/search", get(routes::members::search))
        .route("/api/members/{id}", get(routes::members::get))
        .route("/api/members/{id}/email", put(routes::members::change_email))
        .route(
            "/api/members/{id}/address",
            put(routes::members::change_address),
        )
        .route(
            "/api/members/{id}/deactivate",
            post(routes::members::deactivate),
        )
        .route("/api/members/{id}/activate", post(routes::members::activate))
        .route("/api/loans/borrow", post(routes::loans::borrow))
        .route("/api/loans/overdue", get(routes::loans::overdue))
        .route("/api/loans/due", get(routes::loans::due_between))
        .route("/api/loans/member/{member_id}", get(routes::loans::by_member))
        .route("/api/loans/{id}", get(routes::loans::get))
        .route("/api/loans/{id}/return", post(routes::loans::return_book))
        .route("/api/loans/{id}/extend", post(routes::loans::extend))
        .route("/api/loans/{id}/notes", post(routes::loans::add_note))
        .route("/api/loans/{id}/late-fee", get(routes::loans::late_fee))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over in-memory repositories.
///
/// The Postgres-backed repositories in the `store` crate slot in the same
/// way once a pool is available; the services only see the traits.
pub fn create_default_state(config: &Config) -> Arc<AppState> {
    let books = Arc::new(InMemoryBookRepository::new());
    let members = Arc::new(InMemoryMemberRepository::new());
    let loans = Arc::new(InMemoryLoanRepository::new());
    let publisher = Arc::new(TracingEventPublisher::new());

    Arc::new(AppState {
        books: BookService::new(books.clone()),
        members: MemberService::new(members.clone()),
        loans: LoanService::with_loan_limit(
            loans,
            books,
            members,
            publisher,
            config.max_active_loans,
        ),
    })
}
