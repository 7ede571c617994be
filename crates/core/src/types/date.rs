//! Calendar date parsing for form and CLI input.

use chrono::NaiveDate;

/// The only accepted input format: `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur when parsing a calendar date.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The input string is empty.
    #[error("date cannot be empty")]
    Empty,
    /// The input is not a valid `YYYY-MM-DD` date.
    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    Invalid {
        /// The rejected input.
        input: String,
    },
}

/// Parse a required `YYYY-MM-DD` date.
///
/// Surrounding whitespace is ignored.
///
/// ```
/// use bookshelf_core::{DateError, parse_date};
///
/// assert!(parse_date("1970-01-01").is_ok());
/// assert_eq!(parse_date(""), Err(DateError::Empty));
/// assert!(parse_date("01/01/1970").is_err());
/// ```
///
/// # Errors
///
/// Returns [`DateError::Empty`] for blank input and [`DateError::Invalid`]
/// when the input is not a real calendar date in `YYYY-MM-DD` form.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateError::Empty);
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| DateError::Invalid {
        input: trimmed.to_owned(),
    })
}

/// Parse an optional `YYYY-MM-DD` date.
///
/// `None` and blank strings both mean "no date".
///
/// # Errors
///
/// Returns [`DateError::Invalid`] when a non-blank input does not parse.
pub fn parse_optional_date(input: Option<&str>) -> Result<Option<NaiveDate>, DateError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_date() {
        let date = parse_date("1970-01-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(parse_date("  2001-09-11 ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_date(""), Err(DateError::Empty));
        assert_eq!(parse_date("   "), Err(DateError::Empty));
    }

    #[test]
    fn test_parse_wrong_format() {
        assert!(matches!(
            parse_date("01/02/1970"),
            Err(DateError::Invalid { .. })
        ));
        assert!(matches!(
            parse_date("yesterday"),
            Err(DateError::Invalid { .. })
        ));
    }

    #[test]
    fn test_parse_impossible_date() {
        assert!(matches!(
            parse_date("2023-02-30"),
            Err(DateError::Invalid { .. })
        ));
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(parse_optional_date(None), Ok(None));
        assert_eq!(parse_optional_date(Some("")), Ok(None));
        assert_eq!(parse_optional_date(Some("  ")), Ok(None));
    }

    #[test]
    fn test_optional_value_is_parsed() {
        let date = parse_optional_date(Some("2020-05-17")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 5, 17));
        assert!(parse_optional_date(Some("2020-13-01")).is_err());
    }
}
