//! Loan ledger repository.
//!
//! The ledger is append/update only; nothing here deletes a record. Writes
//! that must stay consistent with the copy registry run through the
//! transactional variants, driven by the circulation service.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use sqlx::error::ErrorKind as SqlxErrorKind;
use uuid::Uuid;

use libris_core::error::{AppError, ErrorKind};
use libris_core::result::AppResult;
use libris_core::types::pagination::{PageRequest, PageResponse};
use libris_entity::loan::{CreateLoan, LoanDetail, LoanFilter, LoanPatch, LoanRecord};

/// Joined projection used by every detail/list query.
const DETAIL_SELECT: &str = "SELECT lr.record_id, lr.user_id, u.username, \
     u.display_name AS user_display_name, lr.copy_id, c.barcode, c.book_id, \
     b.title AS book_title, b.author AS book_author, lr.borrow_date, \
     lr.due_date, lr.return_date, lr.status \
     FROM loan_records lr \
     JOIN users u ON u.user_id = lr.user_id \
     JOIN book_copies c ON c.copy_id = lr.copy_id \
     JOIN books b ON b.book_id = c.book_id";

/// Repository for loan ledger rows.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// Create a new loan repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a new loan inside the caller's transaction.
    ///
    /// The partial unique index on active loans turns a lost borrow race
    /// into `Conflict` even if the row lock was bypassed.
    pub async fn create_in(
        &self,
        conn: &mut PgConnection,
        data: &CreateLoan,
    ) -> AppResult<LoanRecord> {
        sqlx::query_as::<_, LoanRecord>(
            "INSERT INTO loan_records (user_id, copy_id, borrow_date, due_date, status) \
             VALUES ($1, $2, $3, $4, 'checked_out') RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.copy_id)
        .bind(data.borrow_date)
        .bind(data.due_date)
        .fetch_one(conn)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.kind() == SqlxErrorKind::UniqueViolation => {
                AppError::conflict(format!(
                    "Copy {} already has an active loan",
                    data.copy_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create loan record", e),
        })
    }

    /// Find a record by ID.
    pub async fn find_by_id(&self, record_id: Uuid) -> AppResult<Option<LoanRecord>> {
        sqlx::query_as::<_, LoanRecord>("SELECT * FROM loan_records WHERE record_id = $1")
            .bind(record_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find loan record", e)
            })
    }

    /// Find a record by ID, taking a row-level exclusive lock for the
    /// duration of the caller's transaction. Serializes return/override
    /// races on the same record.
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        record_id: Uuid,
    ) -> AppResult<Option<LoanRecord>> {
        sqlx::query_as::<_, LoanRecord>(
            "SELECT * FROM loan_records WHERE record_id = $1 FOR UPDATE",
        )
        .bind(record_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to lock loan record", e)
        })
    }

    /// Find the active loan for a copy, if any.
    pub async fn find_active_by_copy(&self, copy_id: i64) -> AppResult<Option<LoanRecord>> {
        sqlx::query_as::<_, LoanRecord>(
            "SELECT * FROM loan_records WHERE copy_id = $1 AND status = 'checked_out'",
        )
        .bind(copy_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active loan", e)
        })
    }

    /// Transactional variant of [`find_active_by_copy`](Self::find_active_by_copy).
    pub async fn find_active_by_copy_in(
        &self,
        conn: &mut PgConnection,
        copy_id: i64,
    ) -> AppResult<Option<LoanRecord>> {
        sqlx::query_as::<_, LoanRecord>(
            "SELECT * FROM loan_records WHERE copy_id = $1 AND status = 'checked_out'",
        )
        .bind(copy_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active loan", e)
        })
    }

    /// Close a loan inside the caller's transaction.
    ///
    /// The `status = 'checked_out'` guard plus the affected-row count make
    /// a concurrent double return surface as `false` instead of a second
    /// write.
    pub async fn mark_returned_in(
        &self,
        conn: &mut PgConnection,
        record_id: Uuid,
        returned_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE loan_records SET status = 'returned', return_date = $2 \
             WHERE record_id = $1 AND status = 'checked_out'",
        )
        .bind(record_id)
        .bind(returned_at)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark loan returned", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply administrative field changes as given, inside the caller's
    /// transaction. Transition policy is enforced upstream; passing
    /// `clear_return_date` nulls the return date (used when a returned
    /// loan is administratively reopened).
    pub async fn update_in(
        &self,
        conn: &mut PgConnection,
        record_id: Uuid,
        patch: &LoanPatch,
        clear_return_date: bool,
    ) -> AppResult<LoanRecord> {
        sqlx::query_as::<_, LoanRecord>(
            "UPDATE loan_records SET \
             due_date = COALESCE($2, due_date), \
             return_date = CASE WHEN $5 THEN NULL ELSE COALESCE($3, return_date) END, \
             status = COALESCE($4, status) \
             WHERE record_id = $1 RETURNING *",
        )
        .bind(record_id)
        .bind(patch.due_date)
        .bind(patch.return_date)
        .bind(patch.status)
        .bind(clear_return_date)
        .fetch_optional(conn)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.kind() == SqlxErrorKind::UniqueViolation => {
                AppError::conflict("Another active loan already exists for this copy")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update loan record", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Loan record {record_id} not found")))
    }

    /// Find the enriched detail row for a record.
    pub async fn find_detail_by_id(&self, record_id: Uuid) -> AppResult<Option<LoanDetail>> {
        let query = format!("{DETAIL_SELECT} WHERE lr.record_id = $1");
        sqlx::query_as::<_, LoanDetail>(&query)
            .bind(record_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find loan detail", e)
            })
    }

    /// List a user's loans, newest first, with an optional status filter.
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        status: Option<libris_entity::loan::LoanStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LoanDetail>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loan_records \
             WHERE user_id = $1 AND ($2::loan_status IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count loans", e))?;

        let query = format!(
            "{DETAIL_SELECT} \
             WHERE lr.user_id = $1 AND ($2::loan_status IS NULL OR lr.status = $2) \
             ORDER BY lr.borrow_date DESC LIMIT $3 OFFSET $4"
        );
        let loans = sqlx::query_as::<_, LoanDetail>(&query)
            .bind(user_id)
            .bind(status)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list loans", e))?;

        Ok(PageResponse::new(
            loans,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List loans across all users, newest first, with optional borrower,
    /// status, and borrow-date range filters.
    pub async fn list_all(
        &self,
        filter: &LoanFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LoanDetail>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loan_records \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
             AND ($2::loan_status IS NULL OR status = $2) \
             AND ($3::timestamptz IS NULL OR borrow_date >= $3) \
             AND ($4::timestamptz IS NULL OR borrow_date <= $4)",
        )
        .bind(filter.user_id)
        .bind(filter.status)
        .bind(filter.borrowed_from)
        .bind(filter.borrowed_until)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count loans", e))?;

        let query = format!(
            "{DETAIL_SELECT} \
             WHERE ($1::uuid IS NULL OR lr.user_id = $1) \
             AND ($2::loan_status IS NULL OR lr.status = $2) \
             AND ($3::timestamptz IS NULL OR lr.borrow_date >= $3) \
             AND ($4::timestamptz IS NULL OR lr.borrow_date <= $4) \
             ORDER BY lr.borrow_date DESC LIMIT $5 OFFSET $6"
        );
        let loans = sqlx::query_as::<_, LoanDetail>(&query)
            .bind(filter.user_id)
            .bind(filter.status)
            .bind(filter.borrowed_from)
            .bind(filter.borrowed_until)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list loans", e))?;

        Ok(PageResponse::new(
            loans,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List active loans past their due date as of the given instant,
    /// most overdue first.
    pub async fn list_overdue(
        &self,
        as_of: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LoanDetail>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loan_records \
             WHERE status = 'checked_out' AND due_date < $1",
        )
        .bind(as_of)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count overdue loans", e)
        })?;

        let query = format!(
            "{DETAIL_SELECT} \
             WHERE lr.status = 'checked_out' AND lr.due_date < $1 \
             ORDER BY lr.due_date ASC LIMIT $2 OFFSET $3"
        );
        let loans = sqlx::query_as::<_, LoanDetail>(&query)
            .bind(as_of)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list overdue loans", e)
            })?;

        Ok(PageResponse::new(
            loans,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
