//! Session middleware configuration and flash messages.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. Sessions only carry
//! one-shot flash messages shown after a redirect.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::BookshelfConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bookshelf_session";

/// Session key holding the pending flash message.
pub const FLASH_KEY: &str = "flash";

/// Session expiry time in seconds (1 day).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the `SQLite` session store, creating its table if needed.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn create_session_store(pool: &SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Create the session layer around a store.
///
/// # Arguments
///
/// * `store` - `SQLite` session store
/// * `config` - Web configuration (cookie security follows `base_url`)
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &BookshelfConfig,
) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Store a message to show on the next page render.
///
/// # Errors
///
/// Returns the session error if the store cannot be written.
pub async fn set_flash(session: &Session, message: &str) -> Result<(), tower_sessions::session::Error> {
    session.insert(FLASH_KEY, message).await
}

/// Remove and return the pending flash message, if any.
///
/// # Errors
///
/// Returns the session error if the store cannot be read.
pub async fn take_flash(session: &Session) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(FLASH_KEY).await
}
