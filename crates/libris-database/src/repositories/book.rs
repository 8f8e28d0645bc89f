//! Catalog lookup repository.
//!
//! Catalog CRUD belongs to an external system; the circulation core only
//! reads book rows to enrich responses and to validate copy references.

use sqlx::PgPool;

use libris_core::error::{AppError, ErrorKind};
use libris_core::result::AppResult;
use libris_entity::book::Book;

/// Read-only repository over the book catalog.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Create a new book repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a book by ID.
    pub async fn find_by_id(&self, book_id: i64) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = $1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find book", e))
    }

    /// Check whether a book exists.
    pub async fn exists(&self, book_id: i64) -> AppResult<bool> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM books WHERE book_id = $1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check book existence", e)
            })?;
        Ok(found.is_some())
    }
}
