//! Catalog application service.
//!
//! Translates between raw boundary input and domain objects, enforces
//! catalog-wide uniqueness, and otherwise delegates to the entity.

use std::sync::Arc;

use common::BookId;
use domain::{Book, Isbn};
use store::BookRepository;

use crate::error::{CirculationError, Result};

/// Manages the book catalog.
pub struct BookService {
    books: Arc<dyn BookRepository>,
}

impl BookService {
    /// Creates a new service over the given repository.
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// Adds a book to the catalog.
    ///
    /// The ISBN must parse and must not already be in use.
    #[tracing::instrument(skip(self))]
    pub async fn create_book(&self, isbn: &str, title: &str, author: &str) -> Result<Book> {
        let isbn = Isbn::new(isbn)?;

        if self.books.exists_by_isbn(&isbn).await? {
            return Err(CirculationError::DuplicateIsbn(isbn));
        }

        let book = Book::new(BookId::generate(), isbn, title, author)?;
        self.books.save(&book).await?;

        tracing::info!(book_id = %book.id(), title = book.title(), "book created");
        Ok(book)
    }

    /// Loads a book by id.
    pub async fn get_book(&self, id: BookId) -> Result<Book> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or(CirculationError::BookNotFound(id))
    }

    /// Every book in the catalog.
    pub async fn all_books(&self) -> Result<Vec<Book>> {
        Ok(self.books.find_all().await?)
    }

    /// Books currently available for borrowing.
    pub async fn available_books(&self) -> Result<Vec<Book>> {
        Ok(self.books.find_available().await?)
    }

    /// Case-insensitive partial title search.
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<Book>> {
        Ok(self.books.find_by_title_containing(title).await?)
    }

    /// Case-insensitive partial author search.
    pub async fn search_by_author(&self, author: &str) -> Result<Vec<Book>> {
        Ok(self.books.find_by_author_containing(author).await?)
    }

    /// Replaces a book's title.
    #[tracing::instrument(skip(self))]
    pub async fn rename_book(&self, id: BookId, new_title: &str) -> Result<Book> {
        let mut book = self.get_book(id).await?;
        book.update_title(new_title)?;
        self.books.save(&book).await?;
        Ok(book)
    }
}
