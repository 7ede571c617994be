//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use bookshelf_core::BookSort;

use crate::error::Result;
use crate::filters;
use crate::middleware::take_flash;
use crate::models::{AuthorSummary, BookWithAuthor};
use crate::state::AppState;

/// Query parameters for the book list.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub search_query: Option<String>,
    pub sort_by: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub books: Vec<BookWithAuthor>,
    pub authors: Vec<AuthorSummary>,
    pub search_query: String,
    pub sort: BookSort,
    pub sorts: [BookSort; 3],
    pub flash: Option<String>,
}

/// Display the book list with search and sort applied.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> Result<HomeTemplate> {
    let sort = BookSort::from_param(query.sort_by.as_deref());
    let search_query = query.search_query.unwrap_or_default();

    let books = state
        .catalog()
        .list_books(Some(search_query.as_str()), sort)
        .await?;
    let authors = state.catalog().list_authors().await?;
    let flash = take_flash(&session).await?;

    tracing::debug!(books = books.len(), authors = authors.len(), %sort, "Rendering home page");

    Ok(HomeTemplate {
        books,
        authors,
        search_query,
        sort,
        sorts: BookSort::ALL,
        flash,
    })
}
