//! Sort keys for the book listing.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Ordering applied to the book listing on the home page.
///
/// Maps to the `sort_by` query parameter. Anything the listing does not
/// recognise falls back to [`BookSort::Title`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookSort {
    /// Ascending by title.
    #[default]
    Title,
    /// Ascending by author name.
    Author,
    /// Ascending by publication date, undated books first.
    PublicationDate,
}

impl BookSort {
    /// Every sort key, in the order the listing offers them.
    pub const ALL: [Self; 3] = [Self::Title, Self::Author, Self::PublicationDate];

    /// Resolve the `sort_by` query parameter.
    ///
    /// Missing, blank, or unknown values resolve to the default title order.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("author") => Self::Author,
            Some("publication_date") => Self::PublicationDate,
            _ => Self::Title,
        }
    }

    /// The query parameter value for this key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::PublicationDate => "publication_date",
        }
    }

    /// Human-readable label for sort controls.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::PublicationDate => "Publication date",
        }
    }
}

impl fmt::Display for BookSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_param_known_values() {
        assert_eq!(BookSort::from_param(Some("title")), BookSort::Title);
        assert_eq!(BookSort::from_param(Some("author")), BookSort::Author);
        assert_eq!(
            BookSort::from_param(Some("publication_date")),
            BookSort::PublicationDate
        );
    }

    #[test]
    fn test_from_param_falls_back_to_title() {
        assert_eq!(BookSort::from_param(None), BookSort::Title);
        assert_eq!(BookSort::from_param(Some("")), BookSort::Title);
        assert_eq!(BookSort::from_param(Some("rating")), BookSort::Title);
    }

    #[test]
    fn test_param_round_trips_through_as_str() {
        for sort in BookSort::ALL {
            assert_eq!(BookSort::from_param(Some(sort.as_str())), sort);
        }
    }

    #[test]
    fn test_serde_uses_query_values() {
        let json = serde_json::to_string(&BookSort::PublicationDate).unwrap();
        assert_eq!(json, "\"publication_date\"");
    }
}
