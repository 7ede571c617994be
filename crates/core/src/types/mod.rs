//! Core types for Bookshelf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod date;
pub mod id;
pub mod sort;

pub use date::{DATE_FORMAT, DateError, parse_date, parse_optional_date};
pub use id::*;
pub use sort::BookSort;
