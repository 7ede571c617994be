//! Integration tests for Bookshelf.
//!
//! Each test spawns the full web app on an ephemeral port, backed by a fresh
//! in-memory `SQLite` database, and drives it over HTTP with `reqwest`.
//! The volumes search API is replaced by a `wiremock` server where a test
//! needs ISBN/cover lookups.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookshelf-integration-tests
//! ```

#![allow(clippy::expect_used)]

use std::collections::HashMap;

use reqwest::{Client, Response, redirect};
use tokio::task::JoinHandle;

use bookshelf_web::config::BookshelfConfig;
use bookshelf_web::db::{create_memory_pool, run_migrations};
use bookshelf_web::middleware::create_session_store;
use bookshelf_web::services::CatalogService;
use bookshelf_web::state::AppState;

/// A running app plus clients pointed at it.
pub struct TestApp {
    /// Base URL, e.g. `http://127.0.0.1:43123`.
    pub base_url: String,
    /// Client that keeps cookies and follows redirects.
    pub client: Client,
    /// Client that keeps its own cookies and never follows redirects.
    pub no_redirect: Client,
    /// Direct access to the catalog behind the server.
    pub catalog: CatalogService,
    server: JoinHandle<()>,
}

impl TestApp {
    /// Spawn the app with ISBN/cover lookups disabled.
    pub async fn spawn() -> Self {
        Self::spawn_with(&[("BOOKSHELF_METADATA_ENABLED", "false")]).await
    }

    /// Spawn the app with lookups sent to `endpoint`.
    pub async fn spawn_with_metadata(endpoint: &str) -> Self {
        Self::spawn_with(&[
            ("BOOKSHELF_METADATA_ENABLED", "true"),
            ("BOOKSHELF_METADATA_URL", endpoint),
            ("BOOKSHELF_METADATA_TIMEOUT_SECS", "2"),
        ])
        .await
    }

    async fn spawn_with(vars: &[(&str, &str)]) -> Self {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let config = BookshelfConfig::from_source(|key| vars.get(key).cloned())
            .expect("Failed to build test configuration");

        let pool = create_memory_pool()
            .await
            .expect("Failed to create in-memory pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        let session_store = create_session_store(&pool)
            .await
            .expect("Failed to create session store");

        let state = AppState::new(config, pool).expect("Failed to build app state");
        let catalog = state.catalog().clone();
        let app = bookshelf_web::app(state, session_store);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Test server failed: {e}");
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create HTTP client"),
            no_redirect: Client::builder()
                .cookie_store(true)
                .redirect(redirect::Policy::none())
                .build()
                .expect("Failed to create HTTP client"),
            catalog,
            server,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` with the redirect-following client.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to `path` with the redirect-following client.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET `path` and return the body, asserting a 200.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK, "GET {path}");
        response.text().await.expect("Failed to read body")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Volumes search response carrying one item with the given identifiers.
#[must_use]
pub fn volumes_body(identifiers: &[(&str, &str)], thumbnail: Option<&str>) -> serde_json::Value {
    let identifiers: Vec<_> = identifiers
        .iter()
        .map(|(kind, id)| serde_json::json!({"type": kind, "identifier": id}))
        .collect();

    let mut volume_info = serde_json::json!({ "industryIdentifiers": identifiers });
    if let Some(thumbnail) = thumbnail {
        volume_info["imageLinks"] = serde_json::json!({ "thumbnail": thumbnail });
    }

    serde_json::json!({ "items": [{ "volumeInfo": volume_info }] })
}
