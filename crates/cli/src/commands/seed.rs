//! Seed an empty catalog with sample authors and books.
//!
//! Books are inserted directly, without the ISBN/cover lookup, so seeding
//! works offline. Nothing is inserted if any author already exists.

use sqlx::SqlitePool;

use bookshelf_core::{parse_date, parse_optional_date};
use bookshelf_web::db::{AuthorRepository, BookRepository};
use bookshelf_web::models::{NewAuthor, NewBook};

use super::{CommandError, connect};

struct SeedAuthor {
    name: &'static str,
    birth_date: &'static str,
    date_of_death: Option<&'static str>,
    books: &'static [(&'static str, Option<&'static str>)],
}

const SEED_AUTHORS: &[SeedAuthor] = &[
    SeedAuthor {
        name: "Jane Austen",
        birth_date: "1775-12-16",
        date_of_death: Some("1817-07-18"),
        books: &[
            ("Pride and Prejudice", Some("1813-01-28")),
            ("Emma", Some("1815-12-23")),
        ],
    },
    SeedAuthor {
        name: "Frank Herbert",
        birth_date: "1920-10-08",
        date_of_death: Some("1986-02-11"),
        books: &[("Dune", Some("1965-08-01")), ("Dune Messiah", None)],
    },
    SeedAuthor {
        name: "Ursula K. Le Guin",
        birth_date: "1929-10-21",
        date_of_death: Some("2018-01-22"),
        books: &[("A Wizard of Earthsea", Some("1968-11-01"))],
    },
];

/// What a seed run inserted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub authors: usize,
    pub books: usize,
}

/// Seed the configured database.
pub async fn run() -> Result<(), CommandError> {
    let (_, pool) = connect().await?;
    let summary = seed_catalog(&pool).await?;

    if summary == SeedSummary::default() {
        tracing::info!("Catalog already has authors, skipping seed");
    } else {
        tracing::info!(
            authors = summary.authors,
            books = summary.books,
            "Seed complete"
        );
    }
    Ok(())
}

/// Insert the sample catalog unless authors already exist.
pub async fn seed_catalog(pool: &SqlitePool) -> Result<SeedSummary, CommandError> {
    let authors = AuthorRepository::new(pool);
    if authors.count().await? > 0 {
        return Ok(SeedSummary::default());
    }

    let books = BookRepository::new(pool);
    let mut summary = SeedSummary::default();

    for seed in SEED_AUTHORS {
        let author = authors
            .create(&NewAuthor {
                name: seed.name.to_owned(),
                birth_date: parse_date(seed.birth_date)?,
                date_of_death: parse_optional_date(seed.date_of_death)?,
            })
            .await?;
        summary.authors += 1;

        for (title, published) in seed.books {
            books
                .create(&NewBook {
                    title: (*title).to_owned(),
                    publication_date: parse_optional_date(*published)?,
                    isbn: None,
                    cover_url: None,
                    author_id: author.id,
                })
                .await?;
            summary.books += 1;
        }
    }

    Ok(summary)
}
