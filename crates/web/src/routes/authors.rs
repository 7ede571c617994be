//! Author route handlers.

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

use bookshelf_core::AuthorId;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::set_flash;
use crate::state::AppState;

/// Notice shown after an author is created.
pub const AUTHOR_ADDED: &str = "Author added successfully!";

/// Flash shown after an author is deleted.
pub const AUTHOR_DELETED: &str = "Author and all of their books deleted successfully!";

/// Add author form data.
#[derive(Debug, Deserialize)]
pub struct AddAuthorForm {
    pub author_name: String,
    pub birth_date: String,
    pub date_of_death: Option<String>,
}

/// Add author page template.
#[derive(Template, WebTemplate)]
#[template(path = "add_author.html")]
pub struct AddAuthorTemplate {
    pub message: Option<&'static str>,
}

/// Display the add author form.
pub async fn add_author_page() -> AddAuthorTemplate {
    AddAuthorTemplate { message: None }
}

/// Create an author and re-render the form with a notice.
#[instrument(skip(state))]
pub async fn add_author(
    State(state): State<AppState>,
    Form(form): Form<AddAuthorForm>,
) -> Result<AddAuthorTemplate> {
    let author = state
        .catalog()
        .create_author(
            &form.author_name,
            &form.birth_date,
            form.date_of_death.as_deref(),
        )
        .await?;

    add_breadcrumb("catalog", "Author added", &[("author_id", author.id.to_string())]);

    Ok(AddAuthorTemplate {
        message: Some(AUTHOR_ADDED),
    })
}

/// Delete an author with all of their books, then return to the list.
#[instrument(skip(state, session))]
pub async fn delete_author(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AuthorId>,
) -> Result<Redirect> {
    let deletion = state.catalog().delete_author(id).await?;

    add_breadcrumb(
        "catalog",
        "Author deleted",
        &[
            ("author_id", deletion.author_id.to_string()),
            ("books_removed", deletion.books_removed.to_string()),
        ],
    );

    set_flash(&session, AUTHOR_DELETED).await?;
    Ok(Redirect::to("/"))
}
