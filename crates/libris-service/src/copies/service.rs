//! Registry operations on physical copies.
//!
//! Reads are open to any authenticated user; writes are staff-only.
//! Circulation-driven status changes (borrow, return) go through the
//! circulation service instead, so direct status writes here are for
//! condition changes like `lost` or `damaged`.

use std::sync::Arc;

use tracing::info;

use libris_core::types::{PageRequest, PageResponse};
use libris_core::{AppError, AppResult};
use libris_database::repositories::{BookRepository, CopyRepository};
use libris_entity::copy::{BookCopy, CopyStatus, CreateBookCopy, UpdateBookCopy};

use crate::context::RequestContext;

/// Manages the book copy registry.
pub struct CopyService {
    copies: Arc<CopyRepository>,
    books: Arc<BookRepository>,
}

impl CopyService {
    pub fn new(copies: Arc<CopyRepository>, books: Arc<BookRepository>) -> Self {
        Self { copies, books }
    }

    /// Fetch a single copy.
    pub async fn get_copy(&self, copy_id: i64) -> AppResult<BookCopy> {
        self.copies
            .find_by_id(copy_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Copy {copy_id} not found")))
    }

    /// List a book's copies, optionally filtered by status.
    pub async fn list_by_book(
        &self,
        book_id: i64,
        status: Option<CopyStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BookCopy>> {
        if !self.books.exists(book_id).await? {
            return Err(AppError::not_found(format!("Book {book_id} not found")));
        }
        self.copies.list_by_book(book_id, status, page).await
    }

    /// Register a new copy under an existing book.
    pub async fn add_copy(
        &self,
        ctx: &RequestContext,
        data: &CreateBookCopy,
    ) -> AppResult<BookCopy> {
        ctx.require_admin()?;
        if !self.books.exists(data.book_id).await? {
            return Err(AppError::not_found(format!(
                "Book {} not found",
                data.book_id
            )));
        }
        let copy = self.copies.create(data).await?;
        info!(copy_id = copy.copy_id, barcode = %copy.barcode, "copy registered");
        Ok(copy)
    }

    /// Update a copy's descriptive fields.
    pub async fn update_copy(
        &self,
        ctx: &RequestContext,
        copy_id: i64,
        data: &UpdateBookCopy,
    ) -> AppResult<BookCopy> {
        ctx.require_admin()?;
        self.copies.update(copy_id, data).await
    }

    /// Set a copy's status directly.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        copy_id: i64,
        status: CopyStatus,
    ) -> AppResult<BookCopy> {
        ctx.require_admin()?;
        let copy = self.copies.set_status(copy_id, status).await?;
        info!(copy_id, status = %status, "copy status set");
        Ok(copy)
    }

    /// Remove a copy from the registry. Refused while the copy has an
    /// active loan or any loan history.
    pub async fn remove_copy(&self, ctx: &RequestContext, copy_id: i64) -> AppResult<()> {
        ctx.require_admin()?;
        self.copies.delete(copy_id).await?;
        info!(copy_id, "copy removed");
        Ok(())
    }
}
