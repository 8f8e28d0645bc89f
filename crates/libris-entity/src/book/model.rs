//! Catalog book model.
//!
//! Catalog management (title/author/ISBN CRUD) lives outside the
//! circulation core; this row is read only to enrich loan and copy
//! responses with display fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A cataloged book title.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Unique book identifier.
    pub book_id: i64,
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// ISBN (optional).
    pub isbn: Option<String>,
    /// When the catalog entry was created.
    pub created_at: DateTime<Utc>,
}
