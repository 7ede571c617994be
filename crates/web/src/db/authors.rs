//! Author repository for database operations.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use bookshelf_core::AuthorId;

use super::RepositoryError;
use crate::models::{Author, AuthorSummary, NewAuthor};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for author queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct AuthorRow {
    id: i64,
    name: String,
    birth_date: NaiveDate,
    date_of_death: Option<NaiveDate>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: AuthorId::new(row.id),
            name: row.name,
            birth_date: row.birth_date,
            date_of_death: row.date_of_death,
        }
    }
}

/// Internal row type for authors with their book count.
#[derive(Debug, sqlx::FromRow)]
struct AuthorSummaryRow {
    id: i64,
    name: String,
    birth_date: NaiveDate,
    date_of_death: Option<NaiveDate>,
    book_count: i64,
}

impl From<AuthorSummaryRow> for AuthorSummary {
    fn from(row: AuthorSummaryRow) -> Self {
        Self {
            author: Author {
                id: AuthorId::new(row.id),
                name: row.name,
                birth_date: row.birth_date,
                date_of_death: row.date_of_death,
            },
            book_count: row.book_count,
        }
    }
}

/// Fetch one author on any executor, pool or open transaction.
pub(super) async fn fetch_author<'e, E>(
    executor: E,
    id: AuthorId,
) -> Result<Option<Author>, RepositoryError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let row = sqlx::query_as::<_, AuthorRow>(
        r"
        SELECT id, name, birth_date, date_of_death
        FROM authors
        WHERE id = ?1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Author::from))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for author database operations.
pub struct AuthorRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuthorRepository<'a> {
    /// Create a new author repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new author.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewAuthor) -> Result<Author, RepositoryError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r"
            INSERT INTO authors (name, birth_date, date_of_death)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, birth_date, date_of_death
            ",
        )
        .bind(input.name.as_str())
        .bind(input.birth_date)
        .bind(input.date_of_death)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get an author by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AuthorId) -> Result<Option<Author>, RepositoryError> {
        fetch_author(self.pool, id).await
    }

    /// List every author with their current book count, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AuthorSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuthorSummaryRow>(
            r"
            SELECT a.id, a.name, a.birth_date, a.date_of_death,
                   COUNT(b.id) AS book_count
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            GROUP BY a.id, a.name, a.birth_date, a.date_of_death
            ORDER BY a.name, a.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AuthorSummary::from).collect())
    }

    /// Count all authors.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM authors")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Delete an author and every book they own.
    ///
    /// Runs in a single transaction. Returns the number of books removed, or
    /// `None` if the author does not exist (nothing is deleted).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn delete_with_books(&self, id: AuthorId) -> Result<Option<u64>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM authors WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let books_removed = sqlx::query("DELETE FROM books WHERE author_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM authors WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(books_removed))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{BookRepository, create_memory_pool, run_migrations};
    use crate::models::NewBook;

    async fn setup_test_db() -> SqlitePool {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn new_author(name: &str) -> NewAuthor {
        NewAuthor {
            name: name.to_owned(),
            birth_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            date_of_death: None,
        }
    }

    fn new_book(title: &str, author_id: AuthorId) -> NewBook {
        NewBook {
            title: title.to_owned(),
            publication_date: None,
            isbn: None,
            cover_url: None,
            author_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = setup_test_db().await;
        let repo = AuthorRepository::new(&pool);

        let mut input = new_author("Jane Doe");
        input.date_of_death = NaiveDate::from_ymd_opt(2020, 2, 2);
        let created = repo.create(&input).await.unwrap();

        assert_eq!(created.name, "Jane Doe");
        assert_eq!(created.date_of_death, NaiveDate::from_ymd_opt(2020, 2, 2));

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get_by_id(AuthorId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_includes_book_counts() {
        let pool = setup_test_db().await;
        let authors = AuthorRepository::new(&pool);
        let books = BookRepository::new(&pool);

        let zed = authors.create(&new_author("Zed")).await.unwrap();
        let amy = authors.create(&new_author("Amy")).await.unwrap();
        books.create(&new_book("One", zed.id)).await.unwrap();
        books.create(&new_book("Two", zed.id)).await.unwrap();

        let list = authors.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].author.id, amy.id);
        assert_eq!(list[0].book_count, 0);
        assert_eq!(list[1].author.id, zed.id);
        assert_eq!(list[1].book_count, 2);
        assert_eq!(authors.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_with_books() {
        let pool = setup_test_db().await;
        let authors = AuthorRepository::new(&pool);
        let books = BookRepository::new(&pool);

        let jane = authors.create(&new_author("Jane")).await.unwrap();
        let other = authors.create(&new_author("Other")).await.unwrap();
        books.create(&new_book("A", jane.id)).await.unwrap();
        books.create(&new_book("B", jane.id)).await.unwrap();
        let kept = books.create(&new_book("C", other.id)).await.unwrap();

        let removed = authors.delete_with_books(jane.id).await.unwrap();
        assert_eq!(removed, Some(2));
        assert!(authors.get_by_id(jane.id).await.unwrap().is_none());
        assert_eq!(books.count_by_author(jane.id).await.unwrap(), 0);
        assert!(books.get_by_id(kept.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_author() {
        let pool = setup_test_db().await;
        let authors = AuthorRepository::new(&pool);

        assert_eq!(
            authors.delete_with_books(AuthorId::new(41)).await.unwrap(),
            None
        );
    }
}
