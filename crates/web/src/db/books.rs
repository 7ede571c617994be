//! Book repository for database operations.
//!
//! The author relationship is expressed through explicit queries
//! (`get_author_of`, `list_by_author`, `count_by_author`) rather than
//! navigable object references.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use bookshelf_core::{AuthorId, BookId};

use super::RepositoryError;
use super::authors::{AuthorRow, fetch_author};
use crate::models::{Author, Book, BookDeletion, BookWithAuthor, NewBook};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for book queries.
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    publication_date: Option<NaiveDate>,
    isbn: Option<String>,
    cover_url: Option<String>,
    author_id: i64,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::new(row.id),
            title: row.title,
            publication_date: row.publication_date,
            isbn: row.isbn,
            cover_url: row.cover_url,
            author_id: AuthorId::new(row.author_id),
        }
    }
}

/// Internal row type for books joined with their author's name.
#[derive(Debug, sqlx::FromRow)]
struct BookWithAuthorRow {
    id: i64,
    title: String,
    publication_date: Option<NaiveDate>,
    isbn: Option<String>,
    cover_url: Option<String>,
    author_id: i64,
    author_name: String,
}

impl From<BookWithAuthorRow> for BookWithAuthor {
    fn from(row: BookWithAuthorRow) -> Self {
        Self {
            book: Book {
                id: BookId::new(row.id),
                title: row.title,
                publication_date: row.publication_date,
                isbn: row.isbn,
                cover_url: row.cover_url,
                author_id: AuthorId::new(row.author_id),
            },
            author_name: row.author_name,
        }
    }
}

// =============================================================================
// Shared Queries
// =============================================================================

/// Fetch one book on any executor, pool or open transaction.
async fn fetch_book<'e, E>(executor: E, id: BookId) -> Result<Option<Book>, RepositoryError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let row = sqlx::query_as::<_, BookRow>(
        r"
        SELECT id, title, publication_date, isbn, cover_url, author_id
        FROM books
        WHERE id = ?1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Book::from))
}

/// Count the books referencing an author.
async fn count_books_of<'e, E>(executor: E, author_id: AuthorId) -> Result<i64, RepositoryError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE author_id = ?1")
        .bind(author_id)
        .fetch_one(executor)
        .await?;
    Ok(count)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for book database operations.
pub struct BookRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookRepository<'a> {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new book.
    ///
    /// The author id is stored as given; it is not checked against `authors`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewBook) -> Result<Book, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            INSERT INTO books (title, publication_date, isbn, cover_url, author_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, title, publication_date, isbn, cover_url, author_id
            ",
        )
        .bind(input.title.as_str())
        .bind(input.publication_date)
        .bind(input.isbn.as_deref())
        .bind(input.cover_url.as_deref())
        .bind(input.author_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a book by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        fetch_book(self.pool, id).await
    }

    /// Get the author a book belongs to.
    ///
    /// Returns `None` if the book does not exist or its author does not resolve.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_author_of(&self, id: BookId) -> Result<Option<Author>, RepositoryError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r"
            SELECT a.id, a.name, a.birth_date, a.date_of_death
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE b.id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Author::from))
    }

    /// List the books owned by an author, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_author(&self, author_id: AuthorId) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r"
            SELECT id, title, publication_date, isbn, cover_url, author_id
            FROM books
            WHERE author_id = ?1
            ORDER BY id
            ",
        )
        .bind(author_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Count the books owned by an author.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_author(&self, author_id: AuthorId) -> Result<i64, RepositoryError> {
        count_books_of(self.pool, author_id).await
    }

    /// List every book whose author resolves, joined with the author's name.
    ///
    /// Books referencing a missing author are excluded by the inner join.
    /// Rows come back in insertion order; callers apply their own sort.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_authors(&self) -> Result<Vec<BookWithAuthor>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookWithAuthorRow>(
            r"
            SELECT b.id, b.title, b.publication_date, b.isbn, b.cover_url, b.author_id,
                   a.name AS author_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(BookWithAuthor::from).collect())
    }

    /// Delete a book, and its author too if this was the author's last book.
    ///
    /// The ownership check and both deletes run in one transaction. Returns
    /// `None` if the book does not exist (nothing is deleted).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn delete_cascading(&self, id: BookId) -> Result<Option<BookDeletion>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(book) = fetch_book(&mut *tx, id).await? else {
            return Ok(None);
        };

        let author = fetch_author(&mut *tx, book.author_id).await?;
        let owned_books = count_books_of(&mut *tx, book.author_id).await?;

        sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(book.id)
            .execute(&mut *tx)
            .await?;

        let removed_author = match author {
            Some(author) if owned_books == 1 => {
                sqlx::query("DELETE FROM authors WHERE id = ?1")
                    .bind(author.id)
                    .execute(&mut *tx)
                    .await?;
                Some(author)
            }
            _ => None,
        };

        tx.commit().await?;

        Ok(Some(BookDeletion {
            book,
            removed_author,
        }))
    }
}
