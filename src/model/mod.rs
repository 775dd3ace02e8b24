//! Link records, categories and the pure operations over ordered collections.

pub mod collection;
pub mod link;

pub use collection::{CategoryFilter, DuplicateIdError};
pub use link::{Category, LinkRecord};
