//! Bookshelf configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `BOOKSHELF_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://library.sqlite`)
//! - `BOOKSHELF_HOST` - Bind address (default: 127.0.0.1)
//! - `BOOKSHELF_PORT` - Listen port (default: 5000)
//! - `BOOKSHELF_BASE_URL` - Public URL (default: `http://localhost:5000`)
//! - `BOOKSHELF_METADATA_ENABLED` - Look up ISBNs and covers for new books (default: true)
//! - `BOOKSHELF_METADATA_URL` - Book search endpoint (default: Google Books volumes)
//! - `BOOKSHELF_METADATA_TIMEOUT_SECS` - Lookup timeout (default: 5)
//! - `BOOKSHELF_METADATA_API_KEY` - API key appended to lookups
//! - `BOOKSHELF_LOG_JSON` - Emit JSON log lines instead of text (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default `SQLite` database, created next to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://library.sqlite";

/// Default book search endpoint.
pub const DEFAULT_METADATA_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Default budget for a single metadata lookup.
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Bookshelf application configuration.
#[derive(Debug, Clone)]
pub struct BookshelfConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Book metadata lookup configuration
    pub metadata: MetadataConfig,
    /// Emit structured JSON logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Book metadata (ISBN and cover) lookup configuration.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// Whether new books are enriched at all
    pub enabled: bool,
    /// Volumes search endpoint
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Optional API key sent as the `key` query parameter
    pub api_key: Option<SecretString>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_METADATA_URL.to_owned(),
            timeout: DEFAULT_METADATA_TIMEOUT,
            api_key: None,
        }
    }
}

impl BookshelfConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("BOOKSHELF_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let host = parse_var(&lookup, "BOOKSHELF_HOST", "127.0.0.1", str::parse::<IpAddr>)?;
        let port = parse_var(&lookup, "BOOKSHELF_PORT", "5000", str::parse::<u16>)?;
        let base_url = lookup("BOOKSHELF_BASE_URL")
            .unwrap_or_else(|| "http://localhost:5000".to_owned());

        let metadata = MetadataConfig::from_source(&lookup)?;
        let log_json = parse_var(&lookup, "BOOKSHELF_LOG_JSON", "false", parse_bool)?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            metadata,
            log_json,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl MetadataConfig {
    fn from_source(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let enabled = parse_var(lookup, "BOOKSHELF_METADATA_ENABLED", "true", parse_bool)?;
        let timeout_secs = parse_var(
            lookup,
            "BOOKSHELF_METADATA_TIMEOUT_SECS",
            "5",
            str::parse::<u64>,
        )?;

        Ok(Self {
            enabled,
            endpoint: lookup("BOOKSHELF_METADATA_URL")
                .unwrap_or_else(|| DEFAULT_METADATA_URL.to_owned()),
            timeout: Duration::from_secs(timeout_secs),
            api_key: lookup("BOOKSHELF_METADATA_API_KEY")
                .filter(|v| !v.is_empty())
                .map(SecretString::from),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, using `default` when it is unset.
fn parse_var<T, E: std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    let raw = lookup(key).unwrap_or_else(|| default.to_owned());
    parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).
fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}
