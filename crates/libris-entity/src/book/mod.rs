//! Catalog book entities (read-only from the circulation core's view).

pub mod model;

pub use model::Book;
