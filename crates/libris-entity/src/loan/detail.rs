//! Loan record joined with borrower, copy, and catalog display fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::LoanStatus;

/// A loan record enriched with the display fields callers need, produced
/// by joining `loan_records` with `users`, `book_copies`, and `books`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoanDetail {
    /// Loan record identifier.
    pub record_id: Uuid,
    /// Borrowing user.
    pub user_id: Uuid,
    /// Borrower's login name.
    pub username: String,
    /// Borrower's display name.
    pub user_display_name: Option<String>,
    /// Borrowed copy.
    pub copy_id: i64,
    /// The copy's barcode.
    pub barcode: String,
    /// Catalog entry of the copy.
    pub book_id: i64,
    /// Book title.
    pub book_title: String,
    /// Book author.
    pub book_author: String,
    /// Loan start.
    pub borrow_date: DateTime<Utc>,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Return date, if returned.
    pub return_date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: LoanStatus,
}

impl LoanDetail {
    /// Whether this loan is overdue as of the given instant.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == LoanStatus::CheckedOut && self.due_date < now
    }
}
