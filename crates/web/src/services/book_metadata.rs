//! Book metadata client for ISBN and cover lookups.
//!
//! Queries a Google Books compatible volumes search endpoint with the free
//! text `"{title} {author}"` and reads the first result only. Lookups are
//! best-effort: [`BookMetadataClient::lookup`] never fails, it logs and
//! returns empty metadata instead.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::MetadataConfig;

/// Identifier type preferred for the stored ISBN.
const ISBN_13: &str = "ISBN_13";

/// Fallback identifier type.
const ISBN_10: &str = "ISBN_10";

/// User agent sent with every lookup.
const USER_AGENT: &str = concat!("bookshelf/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when querying the metadata service.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configured endpoint is not a valid URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Metadata extracted for a single book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    /// ISBN-13 if the first result has one, otherwise its first ISBN-10.
    pub isbn: Option<String>,
    /// Cover thumbnail URL of the first result.
    pub cover_url: Option<String>,
}

impl BookMetadata {
    /// Extract metadata from a volumes search response.
    ///
    /// Only the first item is considered. The ISBN and the cover are picked
    /// independently, so either may be present without the other.
    #[must_use]
    pub fn from_response(response: &VolumesResponse) -> Self {
        let Some(info) = response
            .items
            .as_deref()
            .and_then(<[Volume]>::first)
            .and_then(|volume| volume.volume_info.as_ref())
        else {
            return Self::default();
        };

        Self {
            isbn: info.industry_identifiers.as_deref().and_then(select_isbn),
            cover_url: info
                .image_links
                .as_ref()
                .and_then(|links| links.thumbnail.clone())
                .filter(|url| !url.trim().is_empty()),
        }
    }

    /// Whether nothing was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.isbn.is_none() && self.cover_url.is_none()
    }
}

/// Pick the ISBN to store: the first ISBN-13, else the first ISBN-10.
///
/// Entries without a type or a non-blank identifier are skipped.
fn select_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    let usable = |kind: &str| {
        identifiers
            .iter()
            .filter(move |id| id.kind.as_deref() == Some(kind))
            .filter_map(|id| id.identifier.as_deref())
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_owned)
    };

    usable(ISBN_13).or_else(|| usable(ISBN_10))
}

// =============================================================================
// Response Types
// =============================================================================

/// Volumes search response. `items` is absent when nothing matched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

/// A single search result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub volume_info: Option<VolumeInfo>,
}

/// Bibliographic details of a result. Every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
}

/// An identifier such as `{"type": "ISBN_13", "identifier": "978..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Cover image links of a result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Client for the book metadata (volumes search) service.
#[derive(Clone)]
pub struct BookMetadataClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl std::fmt::Debug for BookMetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookMetadataClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BookMetadataClient {
    /// Create a new metadata client.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a valid URL or the HTTP client
    /// fails to build.
    pub fn new(config: &MetadataConfig) -> Result<Self, MetadataError> {
        let endpoint = Url::parse(&config.endpoint)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    /// Search for a book and extract its metadata.
    ///
    /// Makes exactly one request, without retries.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or timeout, a non-success status,
    /// or a body that is not a volumes response.
    #[instrument(skip(self))]
    pub async fn search(&self, title: &str, author: &str) -> Result<BookMetadata, MetadataError> {
        let url = self.search_url(title, author);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let volumes: VolumesResponse =
            serde_json::from_str(&body).map_err(|e| MetadataError::Parse(e.to_string()))?;

        Ok(BookMetadata::from_response(&volumes))
    }

    /// Best-effort lookup: any failure is logged and yields empty metadata.
    pub async fn lookup(&self, title: &str, author: &str) -> BookMetadata {
        match self.search(title, author).await {
            Ok(metadata) => {
                if metadata.is_empty() {
                    tracing::info!(title, author, "No book metadata found");
                } else {
                    tracing::info!(
                        title,
                        author,
                        isbn = ?metadata.isbn,
                        has_cover = metadata.cover_url.is_some(),
                        "Found book metadata"
                    );
                }
                metadata
            }
            Err(e) => {
                tracing::warn!(title, author, error = %e, "Book metadata lookup failed");
                BookMetadata::default()
            }
        }
    }

    /// Build the search URL, `q = "{title} {author}"` plus the optional key.
    fn search_url(&self, title: &str, author: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &format!("{title} {author}"));
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key.expose_secret());
            }
        }
        url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn parse(value: &serde_json::Value) -> BookMetadata {
        let response: VolumesResponse = serde_json::from_value(value.clone()).unwrap();
        BookMetadata::from_response(&response)
    }

    fn client_for(server: &MockServer, timeout: Duration) -> BookMetadataClient {
        BookMetadataClient::new(&MetadataConfig {
            enabled: true,
            endpoint: format!("{}/books/v1/volumes", server.uri()),
            timeout,
            api_key: None,
        })
        .unwrap()
    }

    // =========================================================================
    // Extraction
    // =========================================================================

    #[test]
    fn test_prefers_isbn_13() {
        let metadata = parse(&json!({
            "items": [{
                "volumeInfo": {
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "0000000001"},
                        {"type": "ISBN_13", "identifier": "9780000000001"}
                    ],
                    "imageLinks": {"thumbnail": "http://x/cover.jpg"}
                }
            }]
        }));

        assert_eq!(
            metadata,
            BookMetadata {
                isbn: Some("9780000000001".to_owned()),
                cover_url: Some("http://x/cover.jpg".to_owned()),
            }
        );
    }

    #[test]
    fn test_first_isbn_10_wins_without_isbn_13() {
        let metadata = parse(&json!({
            "items": [{
                "volumeInfo": {
                    "industryIdentifiers": [
                        {"type": "OTHER", "identifier": "OCLC:123"},
                        {"type": "ISBN_10", "identifier": "0000000001"},
                        {"type": "ISBN_10", "identifier": "0000000002"}
                    ]
                }
            }]
        }));

        assert_eq!(metadata.isbn.as_deref(), Some("0000000001"));
        assert_eq!(metadata.cover_url, None);
    }

    #[test]
    fn test_cover_without_isbn() {
        let metadata = parse(&json!({
            "items": [{"volumeInfo": {"imageLinks": {"thumbnail": "http://x/t.jpg"}}}]
        }));

        assert_eq!(metadata.isbn, None);
        assert_eq!(metadata.cover_url.as_deref(), Some("http://x/t.jpg"));
    }

    #[test]
    fn test_only_first_item_is_used() {
        let metadata = parse(&json!({
            "items": [
                {"volumeInfo": {}},
                {"volumeInfo": {
                    "industryIdentifiers": [{"type": "ISBN_13", "identifier": "9781111111111"}],
                    "imageLinks": {"thumbnail": "http://x/second.jpg"}
                }}
            ]
        }));

        assert!(metadata.is_empty());
    }

    #[test]
    fn test_no_items() {
        assert!(parse(&json!({"kind": "books#volumes", "totalItems": 0})).is_empty());
        assert!(parse(&json!({"items": []})).is_empty());
    }

    #[test]
    fn test_incomplete_identifier_keeps_cover_and_isbn() {
        let metadata = parse(&json!({
            "items": [{
                "volumeInfo": {
                    "industryIdentifiers": [
                        {"type": "ISBN_13"},
                        {"identifier": "0000000009"},
                        {"type": "ISBN_13", "identifier": null},
                        {"type": "ISBN_10", "identifier": "0000000001"}
                    ],
                    "imageLinks": {"thumbnail": "http://x/cover.jpg"}
                }
            }]
        }));

        assert_eq!(
            metadata,
            BookMetadata {
                isbn: Some("0000000001".to_owned()),
                cover_url: Some("http://x/cover.jpg".to_owned()),
            }
        );
    }

    #[test]
    fn test_null_identifiers_keep_cover() {
        let metadata = parse(&json!({
            "items": [{
                "volumeInfo": {
                    "industryIdentifiers": null,
                    "imageLinks": {"thumbnail": "http://x/t.jpg"}
                }
            }]
        }));

        assert_eq!(metadata.isbn, None);
        assert_eq!(metadata.cover_url.as_deref(), Some("http://x/t.jpg"));
    }

    #[test]
    fn test_null_volume_info_is_empty() {
        assert!(parse(&json!({"items": [{"volumeInfo": null}]})).is_empty());
    }

    // =========================================================================
    // HTTP
    // =========================================================================

    #[tokio::test]
    async fn test_search_sends_combined_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .and(query_param("q", "Example Title Jane Doe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"volumeInfo": {
                    "industryIdentifiers": [{"type": "ISBN_13", "identifier": "9780000000001"}],
                    "imageLinks": {"thumbnail": "http://x/cover.jpg"}
                }}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let metadata = client.search("Example Title", "Jane Doe").await.unwrap();

        assert_eq!(metadata.isbn.as_deref(), Some("9780000000001"));
        assert_eq!(metadata.cover_url.as_deref(), Some("http://x/cover.jpg"));
    }

    #[tokio::test]
    async fn test_search_appends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = BookMetadataClient::new(&MetadataConfig {
            enabled: true,
            endpoint: format!("{}/books/v1/volumes", server.uri()),
            timeout: Duration::from_secs(5),
            api_key: Some(SecretString::from("abc123")),
        })
        .unwrap();

        assert!(client.search("Dune", "Frank Herbert").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.search("Dune", "Frank Herbert").await.unwrap_err();

        assert!(matches!(err, MetadataError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.search("Dune", "Frank Herbert").await.unwrap_err();

        assert!(matches!(err, MetadataError::Parse(_)));
    }

    #[tokio::test]
    async fn test_lookup_swallows_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [{"volumeInfo": {
                        "imageLinks": {"thumbnail": "http://x/late.jpg"}
                    }}]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(200));
        let metadata = client.lookup("Dune", "Frank Herbert").await;

        assert_eq!(metadata, BookMetadata::default());
    }

    #[tokio::test]
    async fn test_lookup_swallows_connection_error() {
        // Nothing listens on port 1.
        let client = BookMetadataClient::new(&MetadataConfig {
            endpoint: "http://127.0.0.1:1/books/v1/volumes".to_owned(),
            timeout: Duration::from_secs(1),
            ..MetadataConfig::default()
        })
        .unwrap();

        assert!(client.lookup("Dune", "Frank Herbert").await.is_empty());
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = BookMetadataClient::new(&MetadataConfig {
            endpoint: "not a url".to_owned(),
            ..MetadataConfig::default()
        });
        assert!(matches!(result, Err(MetadataError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = BookMetadataClient::new(&MetadataConfig {
            api_key: Some(SecretString::from("super_secret_key")),
            ..MetadataConfig::default()
        })
        .unwrap();

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
    }
}
