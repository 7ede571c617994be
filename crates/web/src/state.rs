//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::BookshelfConfig;
use crate::services::{CatalogService, MetadataError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BookshelfConfig,
    catalog: CatalogService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Bookshelf configuration
    /// * `pool` - `SQLite` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata client cannot be built.
    pub fn new(config: BookshelfConfig, pool: SqlitePool) -> Result<Self, MetadataError> {
        let catalog = CatalogService::from_config(pool, &config.metadata)?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create application state around an existing catalog service.
    #[must_use]
    pub fn with_catalog(config: BookshelfConfig, catalog: CatalogService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &BookshelfConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        self.inner.catalog.pool()
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
