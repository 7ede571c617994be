//! Services for Bookshelf.
//!
//! - [`catalog`] - Listing, creation and cascading deletion of books and authors
//! - [`book_metadata`] - ISBN and cover lookups against the volumes search API

pub mod book_metadata;
pub mod catalog;

pub use book_metadata::{BookMetadata, BookMetadataClient, MetadataError};
pub use catalog::{AuthorDeletion, CatalogError, CatalogService};
