//! Loan record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::LoanStatus;

/// A borrow/return event in the permanent loan ledger.
///
/// Records are created by the borrow operation, mutated by return or
/// administrative override, and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoanRecord {
    /// Unique record identifier, stable for the record's lifetime.
    pub record_id: Uuid,
    /// The borrowing user (non-owning reference).
    pub user_id: Uuid,
    /// The borrowed copy (non-owning reference).
    pub copy_id: i64,
    /// When the loan started; set at creation, never changed.
    pub borrow_date: DateTime<Utc>,
    /// When the copy is due back; always `>= borrow_date`.
    pub due_date: DateTime<Utc>,
    /// When the copy came back; set exactly once, with the transition to
    /// `returned`.
    pub return_date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: LoanStatus,
}

impl LoanRecord {
    /// Whether this loan is overdue as of the given instant.
    ///
    /// Overdue is derived, never stored: an active loan whose due date has
    /// passed. A due date exactly equal to `now` is not yet overdue, and a
    /// returned record is never overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == LoanStatus::CheckedOut && self.due_date < now
    }
}

/// Data required to open a new loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoan {
    /// Borrowing user.
    pub user_id: Uuid,
    /// Borrowed copy.
    pub copy_id: i64,
    /// Loan start.
    pub borrow_date: DateTime<Utc>,
    /// Due date.
    pub due_date: DateTime<Utc>,
}

/// Administrative field changes to an existing loan record.
///
/// Applied as given by the ledger; the transition policy is enforced by
/// the circulation service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanPatch {
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New return date.
    pub return_date: Option<DateTime<Utc>>,
    /// New status.
    pub status: Option<LoanStatus>,
}

impl LoanPatch {
    /// Whether the patch contains no changes at all.
    pub fn is_empty(&self) -> bool {
        self.due_date.is_none() && self.return_date.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(status: LoanStatus, due: DateTime<Utc>) -> LoanRecord {
        LoanRecord {
            record_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            copy_id: 1,
            borrow_date: due - Duration::days(30),
            due_date: due,
            return_date: None,
            status,
        }
    }

    #[test]
    fn test_due_now_is_not_overdue() {
        let now = Utc::now();
        assert!(!record(LoanStatus::CheckedOut, now).is_overdue(now));
    }

    #[test]
    fn test_one_second_past_due_is_overdue() {
        let now = Utc::now();
        let rec = record(LoanStatus::CheckedOut, now - Duration::seconds(1));
        assert!(rec.is_overdue(now));
    }

    #[test]
    fn test_returned_record_is_never_overdue() {
        let now = Utc::now();
        let rec = record(LoanStatus::Returned, now - Duration::days(90));
        assert!(!rec.is_overdue(now));
    }
}
