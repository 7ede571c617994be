//! Book route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use bookshelf_core::{AuthorId, BookId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::set_flash;
use crate::models::AuthorSummary;
use crate::state::AppState;

/// Notice shown after a book is created.
pub const BOOK_ADDED: &str = "Book successfully added!";

/// Flash shown after a book is deleted.
pub const BOOK_DELETED: &str = "Book deleted successfully!";

/// Add book form data.
#[derive(Debug, Deserialize)]
pub struct AddBookForm {
    pub title: String,
    pub publication_date: Option<String>,
    pub author_id: String,
}

/// Add book page template.
#[derive(Template, WebTemplate)]
#[template(path = "add_book.html")]
pub struct AddBookTemplate {
    pub authors: Vec<AuthorSummary>,
    pub message: Option<&'static str>,
}

/// Display the add book form with the author picker.
#[instrument(skip(state))]
pub async fn add_book_page(State(state): State<AppState>) -> Result<AddBookTemplate> {
    let authors = state.catalog().list_authors().await?;
    Ok(AddBookTemplate {
        authors,
        message: None,
    })
}

/// Create a book and re-render the form with a notice.
#[instrument(skip(state))]
pub async fn add_book(
    State(state): State<AppState>,
    Form(form): Form<AddBookForm>,
) -> Result<AddBookTemplate> {
    let author_id: AuthorId = form
        .author_id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid author_id: {}", form.author_id)))?;

    let book = state
        .catalog()
        .create_book(&form.title, form.publication_date.as_deref(), author_id)
        .await?;

    add_breadcrumb(
        "catalog",
        "Book added",
        &[
            ("book_id", book.id.to_string()),
            ("author_id", author_id.to_string()),
        ],
    );

    let authors = state.catalog().list_authors().await?;
    Ok(AddBookTemplate {
        authors,
        message: Some(BOOK_ADDED),
    })
}

/// Delete a book, then return to the list.
#[instrument(skip(state, session))]
pub async fn delete_book(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<BookId>,
) -> Result<Redirect> {
    let deletion = state.catalog().delete_book(id).await?;

    let mut data = vec![("book_id", id.to_string())];
    if let Some(author) = &deletion.removed_author {
        data.push(("removed_author_id", author.id.to_string()));
    }
    add_breadcrumb("catalog", "Book deleted", &data);

    set_flash(&session, BOOK_DELETED).await?;
    Ok(Redirect::to("/"))
}
