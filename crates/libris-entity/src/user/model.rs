//! Borrower directory model.
//!
//! Account management and authentication live outside the circulation
//! core; this row is read only to verify a borrower exists and to enrich
//! loan responses with display fields. Admin status arrives with the
//! resolved request identity, never from this table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A library member as known to the borrower directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub user_id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
