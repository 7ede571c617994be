//! Author and book management commands.
//!
//! These go through the same catalog service as the web app, so validation
//! and the ISBN/cover lookup behave identically.

use bookshelf_core::AuthorId;
use bookshelf_web::services::CatalogService;

use super::{CommandError, connect};

async fn catalog() -> Result<CatalogService, CommandError> {
    let (config, pool) = connect().await?;
    Ok(CatalogService::from_config(pool, &config.metadata)?)
}

/// Add an author.
pub async fn add_author(
    name: &str,
    birth_date: &str,
    date_of_death: Option<&str>,
) -> Result<(), CommandError> {
    let author = catalog()
        .await?
        .create_author(name, birth_date, date_of_death)
        .await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Author added: {author}");
    }
    Ok(())
}

/// Add a book, looking up its ISBN and cover.
pub async fn add_book(
    title: &str,
    author_id: i64,
    publication_date: Option<&str>,
) -> Result<(), CommandError> {
    let author_id = AuthorId::new(author_id);
    let book = catalog()
        .await?
        .create_book(title, publication_date, author_id)
        .await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Book added: {} (ID: {})", book.title, book.id);
        println!("  ISBN:  {}", book.isbn.as_deref().unwrap_or("-"));
        println!("  Cover: {}", book.cover_url.as_deref().unwrap_or("-"));
    }
    Ok(())
}
