//! Bookshelf Core - Shared types library.
//!
//! This crate provides common types used across all Bookshelf components:
//! - `web` - The catalog web application
//! - `cli` - Command-line tools for migrations, seeding and data entry
//!
//! # Architecture
//!
//! The core crate contains only types and parsing helpers - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the book sort key, and calendar date parsing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
