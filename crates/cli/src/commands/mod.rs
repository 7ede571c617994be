//! CLI command implementations.

pub mod catalog;
pub mod migrate;
pub mod seed;

use sqlx::SqlitePool;
use thiserror::Error;

use bookshelf_core::DateError;
use bookshelf_web::config::{BookshelfConfig, ConfigError};
use bookshelf_web::db::{self, RepositoryError};
use bookshelf_web::services::{CatalogError, MetadataError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("metadata client error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("invalid date: {0}")]
    Date(#[from] DateError),
}

/// Load configuration and open the catalog database.
async fn connect() -> Result<(BookshelfConfig, SqlitePool), CommandError> {
    let config = BookshelfConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    Ok((config, pool))
}
