//! Book domain types.

use core::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use bookshelf_core::{AuthorId, BookId};

use super::Author;

/// A book (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Unique book ID.
    pub id: BookId,
    /// Book title.
    pub title: String,
    /// First publication date, if known.
    pub publication_date: Option<NaiveDate>,
    /// ISBN-13 when available, otherwise ISBN-10.
    pub isbn: Option<String>,
    /// Cover thumbnail URL.
    pub cover_url: Option<String>,
    /// Owning author. May not resolve if the author was never created.
    pub author_id: AuthorId,
}

/// Input for inserting a new book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub publication_date: Option<NaiveDate>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub author_id: AuthorId,
}

/// A book joined with the name of its (resolved) author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookWithAuthor {
    pub book: Book,
    pub author_name: String,
}

impl fmt::Display for BookWithAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - (ID: {}) by {} (ID: {})",
            self.book.title, self.book.id, self.author_name, self.book.author_id
        )
    }
}

/// Outcome of deleting a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDeletion {
    /// The book that was removed.
    pub book: Book,
    /// The author, if this was their last book and they were removed too.
    pub removed_author: Option<Author>,
}
