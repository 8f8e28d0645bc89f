//! Loan ledger query filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::LoanStatus;

/// Optional criteria for admin ledger listings.
///
/// All fields are combined with AND; `None` means "any".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanFilter {
    /// Restrict to a single borrower.
    pub user_id: Option<Uuid>,
    /// Restrict to a lifecycle status.
    pub status: Option<LoanStatus>,
    /// Loans that started at or after this instant.
    pub borrowed_from: Option<DateTime<Utc>>,
    /// Loans that started at or before this instant.
    pub borrowed_until: Option<DateTime<Utc>>,
}
