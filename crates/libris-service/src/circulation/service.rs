//! Circulation workflows: borrow, return, administrative override, and
//! the ledger read paths.
//!
//! Every mutation runs in a single transaction and takes a row lock
//! (`SELECT .. FOR UPDATE`) before deciding anything, so two requests
//! racing for the same copy serialize at the database. The partial
//! unique index on active loans backstops the check; a violation
//! surfaces as a conflict, never a double loan.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use libris_core::config::circulation::CirculationConfig;
use libris_core::error::ErrorKind;
use libris_core::types::{PageRequest, PageResponse};
use libris_core::{AppError, AppResult};
use libris_database::repositories::{CopyRepository, LoanRepository, UserRepository};
use libris_entity::copy::CopyStatus;
use libris_entity::loan::{CreateLoan, LoanFilter, LoanPatch, LoanStatus};

use crate::context::RequestContext;

use super::patch::plan_admin_patch;
use super::view::LoanView;

/// Orchestrates the loan ledger against the copy registry.
pub struct CirculationService {
    pool: PgPool,
    copies: Arc<CopyRepository>,
    loans: Arc<LoanRepository>,
    users: Arc<UserRepository>,
    config: CirculationConfig,
}

impl CirculationService {
    pub fn new(
        pool: PgPool,
        copies: Arc<CopyRepository>,
        loans: Arc<LoanRepository>,
        users: Arc<UserRepository>,
        config: CirculationConfig,
    ) -> Self {
        Self {
            pool,
            copies,
            loans,
            users,
            config,
        }
    }

    /// Check a copy out to the requesting user.
    ///
    /// The copy row is locked before the availability check, so a copy
    /// can never end up with two active loans no matter how requests
    /// interleave.
    pub async fn borrow(&self, ctx: &RequestContext, copy_id: i64) -> AppResult<LoanView> {
        if !self.users.exists(ctx.user_id).await? {
            return Err(AppError::not_found(format!(
                "User {} not found",
                ctx.user_id
            )));
        }

        let mut tx = self.begin().await?;

        let copy = self
            .copies
            .find_by_id_for_update(&mut tx, copy_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Copy {copy_id} not found")))?;

        if !copy.status.is_lendable() {
            return Err(AppError::conflict(format!(
                "Copy {copy_id} is not available (status: {})",
                copy.status
            )));
        }
        if self
            .loans
            .find_active_by_copy_in(&mut tx, copy_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Copy {copy_id} already has an active loan"
            )));
        }

        let now = Utc::now();
        let record = self
            .loans
            .create_in(
                &mut tx,
                &CreateLoan {
                    user_id: ctx.user_id,
                    copy_id,
                    borrow_date: now,
                    due_date: now + Duration::days(self.config.loan_period_days),
                },
            )
            .await?;
        self.copies
            .set_status_in(&mut tx, copy_id, CopyStatus::CheckedOut)
            .await?;

        self.commit(tx).await?;
        info!(
            record_id = %record.record_id,
            copy_id,
            user_id = %ctx.user_id,
            "loan opened"
        );

        self.detail_view(record.record_id).await
    }

    /// Return a checked-out copy. Only the borrower may return a loan.
    pub async fn return_loan(
        &self,
        ctx: &RequestContext,
        record_id: uuid::Uuid,
    ) -> AppResult<LoanView> {
        let mut tx = self.begin().await?;

        let record = self
            .loans
            .find_by_id_for_update(&mut tx, record_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Loan record {record_id} not found")))?;

        if record.user_id != ctx.user_id {
            return Err(AppError::forbidden("Only the borrower may return this loan"));
        }
        if record.status != LoanStatus::CheckedOut {
            return Err(AppError::conflict(format!(
                "Loan record {record_id} is already returned"
            )));
        }

        let now = Utc::now();
        if !self.loans.mark_returned_in(&mut tx, record_id, now).await? {
            return Err(AppError::conflict(format!(
                "Loan record {record_id} is already returned"
            )));
        }
        self.copies
            .set_status_in(&mut tx, record.copy_id, CopyStatus::Available)
            .await?;

        self.commit(tx).await?;
        info!(record_id = %record_id, copy_id = record.copy_id, "loan closed");

        self.detail_view(record_id).await
    }

    /// Administrative override of a loan record's fields.
    ///
    /// Closing an active loan frees the copy and defaults the return
    /// date; reopening clears it, and touches the copy only when the
    /// reopen policy says so.
    pub async fn admin_update(
        &self,
        ctx: &RequestContext,
        record_id: uuid::Uuid,
        patch: &LoanPatch,
    ) -> AppResult<LoanView> {
        ctx.require_admin()?;

        let mut tx = self.begin().await?;

        let record = self
            .loans
            .find_by_id_for_update(&mut tx, record_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Loan record {record_id} not found")))?;

        let plan = plan_admin_patch(&record, patch, Utc::now(), self.config.reopen_updates_copy)?;

        if plan.copy_transition == Some(CopyStatus::CheckedOut) {
            // Re-checking out the copy requires it to still be free.
            let copy = self
                .copies
                .find_by_id_for_update(&mut tx, record.copy_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Copy {} not found", record.copy_id))
                })?;
            if !copy.status.is_lendable() {
                return Err(AppError::conflict(format!(
                    "Copy {} is not available (status: {})",
                    record.copy_id, copy.status
                )));
            }
            if self
                .loans
                .find_active_by_copy_in(&mut tx, record.copy_id)
                .await?
                .is_some()
            {
                return Err(AppError::conflict(format!(
                    "Copy {} already has an active loan",
                    record.copy_id
                )));
            }
        }

        self.loans
            .update_in(&mut tx, record_id, &plan.patch, plan.clear_return_date)
            .await?;
        if let Some(status) = plan.copy_transition {
            self.copies
                .set_status_in(&mut tx, record.copy_id, status)
                .await?;
        }

        self.commit(tx).await?;
        info!(record_id = %record_id, admin = %ctx.user_id, "loan record overridden");

        self.detail_view(record_id).await
    }

    /// Fetch one loan with its enrichment fields. Non-admins may only
    /// view their own records.
    pub async fn get_detail(
        &self,
        ctx: &RequestContext,
        record_id: uuid::Uuid,
    ) -> AppResult<LoanView> {
        let detail = self
            .loans
            .find_detail_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Loan record {record_id} not found")))?;

        if !ctx.can_view_records_of(detail.user_id) {
            return Err(AppError::forbidden(
                "Not allowed to view another user's loan records",
            ));
        }
        Ok(LoanView::from_detail(detail, Utc::now()))
    }

    /// The requesting user's own loans, optionally filtered by status.
    pub async fn list_my_loans(
        &self,
        ctx: &RequestContext,
        status: Option<LoanStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LoanView>> {
        let details = self.loans.list_by_user(ctx.user_id, status, page).await?;
        let now = Utc::now();
        Ok(details.map(|d| LoanView::from_detail(d, now)))
    }

    /// Admin-only ledger listing with filters.
    pub async fn list_loans(
        &self,
        ctx: &RequestContext,
        filter: &LoanFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LoanView>> {
        ctx.require_admin()?;
        let details = self.loans.list_all(filter, page).await?;
        let now = Utc::now();
        Ok(details.map(|d| LoanView::from_detail(d, now)))
    }

    /// Admin-only listing of loans past due as of now.
    pub async fn list_overdue(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LoanView>> {
        ctx.require_admin()?;
        let now = Utc::now();
        let details = self.loans.list_overdue(now, page).await?;
        Ok(details.map(|d| LoanView::from_detail(d, now)))
    }

    async fn begin(&self) -> AppResult<sqlx::Transaction<'static, sqlx::Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
    }

    async fn commit(&self, tx: sqlx::Transaction<'static, sqlx::Postgres>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
    }

    async fn detail_view(&self, record_id: uuid::Uuid) -> AppResult<LoanView> {
        let detail = self
            .loans
            .find_detail_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Loan record {record_id} not found")))?;
        Ok(LoanView::from_detail(detail, Utc::now()))
    }
}
