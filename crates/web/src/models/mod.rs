//! Domain models for the catalog.
//!
//! These types represent validated domain objects separate from database row
//! types. Relationships are plain foreign-key values; joined views such as
//! [`BookWithAuthor`] carry the related fields they need explicitly.

pub mod author;
pub mod book;

pub use author::{Author, AuthorSummary, NewAuthor};
pub use book::{Book, BookDeletion, BookWithAuthor, NewBook};
