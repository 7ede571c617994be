//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bookshelf migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKSHELF_DATABASE_URL` - `SQLite` connection string (default: `sqlite://library.sqlite`)
//!
//! Migrations live in `crates/web/migrations/`.

use bookshelf_web::db;

use super::{CommandError, connect};

/// Apply pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let (_, pool) = connect().await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
