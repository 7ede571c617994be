//! Catalog service: the operations behind every page.
//!
//! Owns the database pool and the optional metadata client. Route handlers
//! and the CLI both go through this type, so validation, enrichment and the
//! cascading-delete rules live in one place:
//!
//! - deleting an author deletes all of their books;
//! - deleting an author's last book deletes the author.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use bookshelf_core::{AuthorId, BookId, BookSort, DateError, parse_date, parse_optional_date};

use super::book_metadata::{BookMetadata, BookMetadataClient, MetadataError};
use crate::config::MetadataConfig;
use crate::db::{AuthorRepository, BookRepository, RepositoryError};
use crate::models::{
    Author, AuthorSummary, Book, BookDeletion, BookWithAuthor, NewAuthor, NewBook,
};

/// Errors returned by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The caller supplied a missing or malformed value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    fn invalid_date(field: &str, err: &DateError) -> Self {
        Self::InvalidInput(format!("{field}: {err}"))
    }
}

/// Outcome of deleting an author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorDeletion {
    pub author_id: AuthorId,
    pub books_removed: u64,
}

/// Catalog operations over a shared pool.
#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
    metadata: Option<BookMetadataClient>,
}

impl CatalogService {
    /// Create a catalog service. Pass `None` to skip enrichment entirely.
    #[must_use]
    pub const fn new(pool: SqlitePool, metadata: Option<BookMetadataClient>) -> Self {
        Self { pool, metadata }
    }

    /// Create a catalog service from metadata configuration.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError` if enrichment is enabled and the client cannot
    /// be built.
    pub fn from_config(pool: SqlitePool, config: &MetadataConfig) -> Result<Self, MetadataError> {
        let metadata = if config.enabled {
            Some(BookMetadataClient::new(config)?)
        } else {
            None
        };
        Ok(Self::new(pool, metadata))
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// List books with a resolved author, filtered and sorted.
    ///
    /// A blank `search_query` disables filtering.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_books(
        &self,
        search_query: Option<&str>,
        sort: BookSort,
    ) -> Result<Vec<BookWithAuthor>, CatalogError> {
        let books = BookRepository::new(&self.pool).list_with_authors().await?;

        let mut books = match search_query {
            Some(query) => filter_books(books, query),
            None => books,
        };
        sort_books(&mut books, sort);

        Ok(books)
    }

    /// List every author with their book count, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_authors(&self) -> Result<Vec<AuthorSummary>, CatalogError> {
        Ok(AuthorRepository::new(&self.pool).list().await?)
    }

    /// Fetch an author.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the author does not exist.
    pub async fn get_author(&self, id: AuthorId) -> Result<Author, CatalogError> {
        AuthorRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound {
                entity: "author",
                id: id.as_i64(),
            })
    }

    /// Fetch a book.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the book does not exist.
    pub async fn get_book(&self, id: BookId) -> Result<Book, CatalogError> {
        BookRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound {
                entity: "book",
                id: id.as_i64(),
            })
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create an author from raw form input.
    ///
    /// `birth_date` is required; `date_of_death` may be absent or blank.
    /// Both must be `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` for a blank name or a bad date.
    #[instrument(skip(self))]
    pub async fn create_author(
        &self,
        name: &str,
        birth_date: &str,
        date_of_death: Option<&str>,
    ) -> Result<Author, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput("author name is required".to_owned()));
        }

        let birth_date =
            parse_date(birth_date).map_err(|e| CatalogError::invalid_date("birth_date", &e))?;
        let date_of_death = parse_optional_date(date_of_death)
            .map_err(|e| CatalogError::invalid_date("date_of_death", &e))?;

        let author = AuthorRepository::new(&self.pool)
            .create(&NewAuthor {
                name: name.to_owned(),
                birth_date,
                date_of_death,
            })
            .await?;

        tracing::info!(author_id = %author.id, name = %author.name, "Author created");
        Ok(author)
    }

    /// Create a book from raw form input, enriching it when possible.
    ///
    /// If `author_id` resolves, the metadata service is asked for an ISBN
    /// and cover. If it does not, the book is still stored, without
    /// enrichment. Enrichment failures never fail the creation.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` for a blank title or a bad
    /// publication date.
    #[instrument(skip(self))]
    pub async fn create_book(
        &self,
        title: &str,
        publication_date: Option<&str>,
        author_id: AuthorId,
    ) -> Result<Book, CatalogError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CatalogError::InvalidInput("title is required".to_owned()));
        }

        let publication_date = parse_optional_date(publication_date)
            .map_err(|e| CatalogError::invalid_date("publication_date", &e))?;

        let author = AuthorRepository::new(&self.pool).get_by_id(author_id).await?;
        let metadata = match (&author, &self.metadata) {
            (Some(author), Some(client)) => client.lookup(title, &author.name).await,
            (None, _) => {
                tracing::warn!(%author_id, "Author not found, skipping metadata lookup");
                BookMetadata::default()
            }
            (Some(_), None) => BookMetadata::default(),
        };

        let book = BookRepository::new(&self.pool)
            .create(&NewBook {
                title: title.to_owned(),
                publication_date,
                isbn: metadata.isbn,
                cover_url: metadata.cover_url,
                author_id,
            })
            .await?;

        tracing::info!(
            book_id = %book.id,
            %author_id,
            isbn = ?book.isbn,
            has_cover = book.cover_url.is_some(),
            "Book created"
        );
        Ok(book)
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Delete a book, and its author if it was their only book.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the book does not exist.
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: BookId) -> Result<BookDeletion, CatalogError> {
        let deletion = BookRepository::new(&self.pool)
            .delete_cascading(id)
            .await?
            .ok_or(CatalogError::NotFound {
                entity: "book",
                id: id.as_i64(),
            })?;

        match &deletion.removed_author {
            Some(author) => tracing::info!(
                book_id = %id,
                author_id = %author.id,
                "Book deleted, author had no other books and was deleted"
            ),
            None => tracing::info!(book_id = %id, "Book deleted"),
        }

        Ok(deletion)
    }

    /// Delete an author and all of their books.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the author does not exist.
    #[instrument(skip(self))]
    pub async fn delete_author(&self, id: AuthorId) -> Result<AuthorDeletion, CatalogError> {
        let books_removed = AuthorRepository::new(&self.pool)
            .delete_with_books(id)
            .await?
            .ok_or(CatalogError::NotFound {
                entity: "author",
                id: id.as_i64(),
            })?;

        tracing::info!(author_id = %id, books_removed, "Author and books deleted");

        Ok(AuthorDeletion {
            author_id: id,
            books_removed,
        })
    }
}

// =============================================================================
// Listing helpers
// =============================================================================

/// Keep books whose title or author name contains `query`, ignoring case.
///
/// A blank query keeps everything.
#[must_use]
pub fn filter_books(books: Vec<BookWithAuthor>, query: &str) -> Vec<BookWithAuthor> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return books;
    }

    books
        .into_iter()
        .filter(|entry| {
            entry.book.title.to_lowercase().contains(&needle)
                || entry.author_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stable sort by the requested key. Undated books sort before dated ones.
pub fn sort_books(books: &mut [BookWithAuthor], sort: BookSort) {
    match sort {
        BookSort::Title => books.sort_by(|a, b| a.book.title.cmp(&b.book.title)),
        BookSort::Author => books.sort_by(|a, b| a.author_name.cmp(&b.author_name)),
        BookSort::PublicationDate => books.sort_by_key(|entry| entry.book.publication_date),
    }
}
