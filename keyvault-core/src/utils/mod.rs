//! Shared helpers used by every storage backend.

pub mod datetime;
mod query;

pub use query::{matches_query, sort_newest_first};
