//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Pluralizes "book" for a count.
///
/// Usage in templates: `{{ summary.book_count|book_count }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn book_count(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    let noun = if count == "1" { "book" } else { "books" };
    Ok(format!("{count} {noun}"))
}
