//! Book entity.

use common::BookId;

use crate::values::Isbn;

use super::BookError;

/// A book in the catalog.
///
/// Books are entities: the same `BookId` identifies the same book even as
/// its title changes. Availability is toggled by the borrow/return workflow
/// and never set directly from outside.
#[derive(Debug, Clone)]
pub struct Book {
    id: BookId,
    isbn: Isbn,
    title: String,
    author: String,
    available: bool,
}

impl Book {
    /// Creates a new book. New books start out available.
    pub fn new(
        id: BookId,
        isbn: Isbn,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Self, BookError> {
        let title = title.into();
        let author = author.into();

        if title.trim().is_empty() {
            return Err(BookError::EmptyTitle);
        }
        if author.trim().is_empty() {
            return Err(BookError::EmptyAuthor);
        }

        Ok(Self {
            id,
            isbn,
            title,
            author,
            available: true,
        })
    }

    /// Rebuilds a book from persisted state.
    pub fn restore(
        id: BookId,
        isbn: Isbn,
        title: impl Into<String>,
        author: impl Into<String>,
        available: bool,
    ) -> Result<Self, BookError> {
        let mut book = Self::new(id, isbn, title, author)?;
        book.available = available;
        Ok(book)
    }

    /// Marks the book as borrowed.
    ///
    /// Fails if the book is already unavailable; the workflow layer must
    /// check availability before invoking.
    pub fn mark_unavailable(&mut self) -> Result<(), BookError> {
        if !self.available {
            return Err(BookError::AlreadyUnavailable);
        }
        self.available = false;
        Ok(())
    }

    /// Marks the book as back on the shelf.
    pub fn mark_available(&mut self) -> Result<(), BookError> {
        if self.available {
            return Err(BookError::AlreadyAvailable);
        }
        self.available = true;
        Ok(())
    }

    /// Replaces the title.
    pub fn update_title(&mut self, new_title: impl Into<String>) -> Result<(), BookError> {
        let new_title = new_title.into();
        if new_title.trim().is_empty() {
            return Err(BookError::EmptyTitle);
        }
        self.title = new_title;
        Ok(())
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}

// Entities are equal iff they share an identity, regardless of attributes.
impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Book[id={}, title={}, author={}, available={}]",
            self.id, self.title, self.author, self.available
        )
    }
}
