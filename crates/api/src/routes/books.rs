//! Book catalog endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::BookId;
use domain::Book;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

use super::{SharedState, parse_id};

// -- Request types --

#[derive(Deserialize)]
pub struct CreateBookRequest {
    pub isbn: String,
    pub title: String,
    pub author: String,
}

#[derive(Deserialize)]
pub struct UpdateTitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct BookResponse {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub available: bool,
}

impl BookResponse {
    fn from_book(book: &Book) -> Self {
        Self {
            id: book.id().to_string(),
            isbn: book.isbn().to_string(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            available: book.is_available(),
        }
    }
}

// -- Handlers --

/// POST /api/books — add a book to the catalog.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = state
        .books
        .create_book(&req.isbn, &req.title, &req.author)
        .await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from_book(&book))))
}

/// GET /api/books — list the whole catalog.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state.books.all_books().await?;
    Ok(Json(books.iter().map(BookResponse::from_book).collect()))
}

/// GET /api/books/available — list books that can be borrowed right now.
#[tracing::instrument(skip(state))]
pub async fn available(
    State(state): State<SharedState>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state.books.available_books().await?;
    Ok(Json(books.iter().map(BookResponse::from_book).collect()))
}

/// GET /api/books/{id} — load one book.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book_id: BookId = parse_id(&id)?;
    let book = state.books.get_book(book_id).await?;
    Ok(Json(BookResponse::from_book(&book)))
}

/// GET /api/books/search/title?title= — partial title search.
#[tracing::instrument(skip(state))]
pub async fn search_title(
    State(state): State<SharedState>,
    Query(query): Query<TitleQuery>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state.books.search_by_title(&query.title).await?;
    Ok(Json(books.iter().map(BookResponse::from_book).collect()))
}

/// GET /api/books/search/author?author= — partial author search.
#[tracing::instrument(skip(state))]
pub async fn search_author(
    State(state): State<SharedState>,
    Query(query): Query<AuthorQuery>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state.books.search_by_author(&query.author).await?;
    Ok(Json(books.iter().map(BookResponse::from_book).collect()))
}

/// PUT /api/books/{id}/title — replace a book's title.
#[tracing::instrument(skip(state, req))]
pub async fn rename(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTitleRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let book_id: BookId = parse_id(&id)?;
    let book = state.books.rename_book(book_id, &req.title).await?;
    Ok(Json(BookResponse::from_book(&book)))
}
