//! Physical book copy entities.

pub mod model;
pub mod status;

pub use model::{BookCopy, CreateBookCopy, UpdateBookCopy};
pub use status::CopyStatus;
