//! Copy registry repository.
//!
//! Sole writer of `book_copies.status`. Status flips that must stay
//! consistent with the loan ledger go through the transactional variants,
//! driven by the circulation service.

use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use sqlx::error::ErrorKind as SqlxErrorKind;

use libris_core::error::{AppError, ErrorKind};
use libris_core::result::AppResult;
use libris_core::types::pagination::{PageRequest, PageResponse};
use libris_entity::copy::{BookCopy, CopyStatus, CreateBookCopy, UpdateBookCopy};

/// Repository for book copy rows.
#[derive(Debug, Clone)]
pub struct CopyRepository {
    pool: PgPool,
}

impl CopyRepository {
    /// Create a new copy repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a copy by ID.
    pub async fn find_by_id(&self, copy_id: i64) -> AppResult<Option<BookCopy>> {
        sqlx::query_as::<_, BookCopy>("SELECT * FROM book_copies WHERE copy_id = $1")
            .bind(copy_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find copy", e))
    }

    /// Find a copy by ID, taking a row-level exclusive lock for the
    /// duration of the caller's transaction.
    ///
    /// Concurrent borrows of the same copy serialize on this lock.
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        copy_id: i64,
    ) -> AppResult<Option<BookCopy>> {
        sqlx::query_as::<_, BookCopy>("SELECT * FROM book_copies WHERE copy_id = $1 FOR UPDATE")
            .bind(copy_id)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock copy row", e)
            })
    }

    /// Check whether a barcode is already registered.
    pub async fn exists_barcode(&self, barcode: &str) -> AppResult<bool> {
        let found: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM book_copies WHERE barcode = $1")
                .bind(barcode)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to check barcode", e)
                })?;
        Ok(found.is_some())
    }

    /// List the copies of a book with pagination and an optional status filter.
    pub async fn list_by_book(
        &self,
        book_id: i64,
        status: Option<CopyStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BookCopy>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_copies \
             WHERE book_id = $1 AND ($2::copy_status IS NULL OR status = $2)",
        )
        .bind(book_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count copies", e))?;

        let copies = sqlx::query_as::<_, BookCopy>(
            "SELECT * FROM book_copies \
             WHERE book_id = $1 AND ($2::copy_status IS NULL OR status = $2) \
             ORDER BY copy_id LIMIT $3 OFFSET $4",
        )
        .bind(book_id)
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list copies", e))?;

        Ok(PageResponse::new(
            copies,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Register a new copy. A duplicate barcode maps to `Conflict`.
    pub async fn create(&self, data: &CreateBookCopy) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            "INSERT INTO book_copies \
             (book_id, barcode, location, status, acquisition_date, acquisition_price, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.book_id)
        .bind(&data.barcode)
        .bind(&data.location)
        .bind(data.status.unwrap_or(CopyStatus::Available))
        .bind(data.acquisition_date)
        .bind(data.acquisition_price)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.kind() == SqlxErrorKind::UniqueViolation => {
                AppError::conflict(format!("Barcode '{}' is already registered", data.barcode))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create copy", e),
        })
    }

    /// Update a copy's descriptive fields; only provided fields change.
    pub async fn update(&self, copy_id: i64, data: &UpdateBookCopy) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            "UPDATE book_copies SET \
             barcode = COALESCE($2, barcode), \
             location = COALESCE($3, location), \
             acquisition_date = COALESCE($4, acquisition_date), \
             acquisition_price = COALESCE($5, acquisition_price), \
             notes = COALESCE($6, notes), \
             updated_at = NOW() \
             WHERE copy_id = $1 RETURNING *",
        )
        .bind(copy_id)
        .bind(&data.barcode)
        .bind(&data.location)
        .bind(data.acquisition_date)
        .bind(data.acquisition_price)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.kind() == SqlxErrorKind::UniqueViolation => {
                AppError::conflict("Barcode is already in use by another copy")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update copy", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Copy {copy_id} not found")))
    }

    /// Set a copy's status. Side effect only: loan consistency is the
    /// circulation service's responsibility.
    pub async fn set_status(&self, copy_id: i64, status: CopyStatus) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            "UPDATE book_copies SET status = $2, updated_at = NOW() \
             WHERE copy_id = $1 RETURNING *",
        )
        .bind(copy_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set copy status", e))?
        .ok_or_else(|| AppError::not_found(format!("Copy {copy_id} not found")))
    }

    /// Transactional variant of [`set_status`](Self::set_status).
    pub async fn set_status_in(
        &self,
        conn: &mut PgConnection,
        copy_id: i64,
        status: CopyStatus,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE book_copies SET status = $2, updated_at = NOW() WHERE copy_id = $1",
        )
        .bind(copy_id)
        .bind(status)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set copy status", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Copy {copy_id} not found")));
        }
        Ok(())
    }

    /// Check whether the copy has an active (checked-out) loan.
    pub async fn exists_active_loan(&self, copy_id: i64) -> AppResult<bool> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM loan_records WHERE copy_id = $1 AND status = 'checked_out'",
        )
        .bind(copy_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check active loan", e)
        })?;
        Ok(found.is_some())
    }

    /// Delete a copy. Refused with `Conflict` while an active loan exists,
    /// or while the permanent ledger still references the copy.
    pub async fn delete(&self, copy_id: i64) -> AppResult<()> {
        if self.exists_active_loan(copy_id).await? {
            return Err(AppError::conflict(format!(
                "Copy {copy_id} is currently checked out and cannot be deleted"
            )));
        }

        let result = sqlx::query("DELETE FROM book_copies WHERE copy_id = $1")
            .bind(copy_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.kind() == SqlxErrorKind::ForeignKeyViolation => {
                    AppError::conflict(format!(
                        "Copy {copy_id} has loan history and cannot be deleted"
                    ))
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to delete copy", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Copy {copy_id} not found")));
        }
        Ok(())
    }
}
