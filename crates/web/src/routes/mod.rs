//! HTTP route handlers for the web app.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                      - Book list (search_query, sort_by) and authors
//! GET  /health                - Liveness check
//! GET  /health/ready          - Readiness check (database)
//!
//! # Authors
//! GET  /add_author            - Add author form
//! POST /add_author            - Create author
//! POST /author/{id}/delete    - Delete author and all of their books
//!
//! # Books
//! GET  /add_book              - Add book form
//! POST /add_book              - Create book (with ISBN/cover lookup)
//! POST /book/{id}/delete      - Delete book (and its author if it was the last one)
//! ```

pub mod authors;
pub mod books;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the page routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route(
            "/add_author",
            get(authors::add_author_page).post(authors::add_author),
        )
        .route("/author/{id}/delete", post(authors::delete_author))
        .route("/add_book", get(books::add_book_page).post(books::add_book))
        .route("/book/{id}/delete", post(books::delete_book))
}
