//! Read-side loan representation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use libris_entity::loan::{LoanDetail, LoanStatus};

/// A loan record enriched for display, with overdue derived at read time.
#[derive(Debug, Clone, Serialize)]
pub struct LoanView {
    pub record_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub user_display_name: Option<String>,
    pub copy_id: i64,
    pub barcode: String,
    pub book_id: i64,
    pub book_title: String,
    pub book_author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub is_overdue: bool,
}

impl LoanView {
    /// Build a view from a joined row, deriving `is_overdue` against the
    /// given instant.
    pub fn from_detail(detail: LoanDetail, now: DateTime<Utc>) -> Self {
        let is_overdue = detail.is_overdue(now);
        Self {
            record_id: detail.record_id,
            user_id: detail.user_id,
            username: detail.username,
            user_display_name: detail.user_display_name,
            copy_id: detail.copy_id,
            barcode: detail.barcode,
            book_id: detail.book_id,
            book_title: detail.book_title,
            book_author: detail.book_author,
            borrow_date: detail.borrow_date,
            due_date: detail.due_date,
            return_date: detail.return_date,
            status: detail.status,
            is_overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn detail(status: LoanStatus, due: DateTime<Utc>) -> LoanDetail {
        LoanDetail {
            record_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            user_display_name: Some("Alice".to_string()),
            copy_id: 7,
            barcode: "BC-0007".to_string(),
            book_id: 3,
            book_title: "The Left Hand of Darkness".to_string(),
            book_author: "Ursula K. Le Guin".to_string(),
            borrow_date: due - Duration::days(30),
            due_date: due,
            return_date: None,
            status,
        }
    }

    #[test]
    fn test_active_past_due_is_overdue() {
        let now = Utc::now();
        let view = LoanView::from_detail(detail(LoanStatus::CheckedOut, now - Duration::days(2)), now);
        assert!(view.is_overdue);
    }

    #[test]
    fn test_due_exactly_now_is_not_overdue() {
        let now = Utc::now();
        let view = LoanView::from_detail(detail(LoanStatus::CheckedOut, now), now);
        assert!(!view.is_overdue);
    }

    #[test]
    fn test_returned_is_not_overdue() {
        let now = Utc::now();
        let view = LoanView::from_detail(detail(LoanStatus::Returned, now - Duration::days(2)), now);
        assert!(!view.is_overdue);
    }
}
