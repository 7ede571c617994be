//! Integration tests for page rendering, creation forms and listing.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use reqwest::StatusCode;

use bookshelf_core::{AuthorId, BookSort};
use bookshelf_integration_tests::TestApp;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = app.get("/health/ready").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "integration-42")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()["x-request-id"], "integration-42");
}

#[tokio::test]
async fn test_static_stylesheet_is_served() {
    let app = TestApp::spawn().await;

    let resp = app.get("/static/css/main.css").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Adding authors
// ============================================================================

#[tokio::test]
async fn test_add_author_form_and_submit() {
    let app = TestApp::spawn().await;

    let form = app.page("/add_author").await;
    assert!(form.contains(r#"name="author_name""#));
    assert!(!form.contains("Author added successfully!"));

    let resp = app
        .post_form(
            "/add_author",
            &[
                ("author_name", "Jane Doe"),
                ("birth_date", "1970-01-01"),
                ("date_of_death", ""),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Author added successfully!"));

    let authors = app.catalog.list_authors().await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].author.name, "Jane Doe");
    assert_eq!(authors[0].author.date_of_death, None);
}

#[tokio::test]
async fn test_add_author_rejects_bad_dates() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/add_author",
            &[("author_name", "Jane Doe"), ("birth_date", "01/01/1970")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .post_form(
            "/add_author",
            &[
                ("author_name", "Jane Doe"),
                ("birth_date", "1970-01-01"),
                ("date_of_death", "yesterday"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(app.catalog.list_authors().await.unwrap().is_empty());
}

// ============================================================================
// Adding books
// ============================================================================

#[tokio::test]
async fn test_add_book_form_lists_authors() {
    let app = TestApp::spawn().await;
    let author = app
        .catalog
        .create_author("Jane Doe", "1970-01-01", Some("2020-02-02"))
        .await
        .unwrap();

    let form = app.page("/add_book").await;
    assert!(form.contains(&format!(r#"<option value="{}">"#, author.id)));
    assert!(form.contains(&format!("Jane Doe - (ID: {}) 1970-01-01 - 2020-02-02", author.id)));
}

#[tokio::test]
async fn test_add_book_without_lookup() {
    let app = TestApp::spawn().await;
    let author = app
        .catalog
        .create_author("Jane Doe", "1970-01-01", None)
        .await
        .unwrap();

    let resp = app
        .post_form(
            "/add_book",
            &[
                ("title", "Example Title"),
                ("publication_date", "2001-09-09"),
                ("author_id", &author.id.to_string()),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Book successfully added!"));

    let books = app.catalog.list_books(None, BookSort::Title).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].book.title, "Example Title");
    assert_eq!(books[0].book.isbn, None);
    assert_eq!(books[0].book.cover_url, None);
}

#[tokio::test]
async fn test_add_book_rejects_non_numeric_author_id() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form("/add_book", &[("title", "Example"), ("author_id", "abc")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_book_with_unknown_author_is_stored_but_hidden() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form("/add_book", &[("title", "Orphan"), ("author_id", "404")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let home = app.page("/").await;
    assert!(!home.contains("Orphan"));
    assert!(
        app.catalog
            .list_books(Some("orphan"), BookSort::Title)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(app.catalog.get_author(AuthorId::new(404)).await.is_err());
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_home_search_and_sort() {
    let app = TestApp::spawn().await;
    let herbert = app
        .catalog
        .create_author("Frank Herbert", "1920-10-08", None)
        .await
        .unwrap();
    let austen = app
        .catalog
        .create_author("Jane Austen", "1775-12-16", Some("1817-07-18"))
        .await
        .unwrap();
    app.catalog
        .create_book("Dune", Some("1965-08-01"), herbert.id)
        .await
        .unwrap();
    app.catalog
        .create_book("Emma", Some("1815-12-23"), austen.id)
        .await
        .unwrap();
    app.catalog
        .create_book("Children of Dune", None, herbert.id)
        .await
        .unwrap();

    let position = |body: &str, needle: &str| body.find(needle).expect(needle);

    // Default: title order.
    let body = app.page("/").await;
    assert!(position(&body, "<strong>Children of Dune -") < position(&body, "<strong>Dune -"));
    assert!(position(&body, "<strong>Dune -") < position(&body, "<strong>Emma -"));

    // Undated first, then by date.
    let body = app.page("/?sort_by=publication_date").await;
    assert!(position(&body, "<strong>Children of Dune -") < position(&body, "<strong>Emma -"));
    assert!(position(&body, "<strong>Emma -") < position(&body, "<strong>Dune -"));
    assert!(body.contains(r#"<option value="publication_date" selected>"#));

    // Case-insensitive search on author name.
    let body = app.page("/?search_query=AUSTEN&sort_by=author").await;
    assert!(body.contains("<strong>Emma -"));
    assert!(!body.contains("Dune"));
    assert!(body.contains(r#"value="AUSTEN""#));

    // Unknown sort keys fall back to title.
    let body = app.page("/?sort_by=rating").await;
    assert!(body.contains(r#"<option value="title" selected>"#));
}

#[tokio::test]
async fn test_home_lists_authors_with_book_counts() {
    let app = TestApp::spawn().await;
    let author = app
        .catalog
        .create_author("Jane Doe", "1970-01-01", None)
        .await
        .unwrap();
    app.catalog.create_book("One", None, author.id).await.unwrap();

    let body = app.page("/").await;
    assert!(body.contains(&format!("Jane Doe - (ID: {}) 1970-01-01", author.id)));
    assert!(body.contains("1 book"));
    assert!(body.contains(&format!(r#"action="/author/{}/delete""#, author.id)));
}
