//! Author domain types.

use core::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use bookshelf_core::AuthorId;

/// An author (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    /// Unique author ID.
    pub id: AuthorId,
    /// Display name.
    pub name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Date of death; `None` means living or unknown.
    pub date_of_death: Option<NaiveDate>,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - (ID: {}) {}", self.name, self.id, self.birth_date)?;
        if let Some(death) = self.date_of_death {
            write!(f, " - {death}")?;
        }
        Ok(())
    }
}

/// An author together with the number of books they currently own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub author: Author,
    pub book_count: i64,
}

/// Input for inserting a new author.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: NaiveDate,
    pub date_of_death: Option<NaiveDate>,
}
