//! Book copy entity model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::CopyStatus;

/// A specific physical instance of a cataloged book.
///
/// The status field is owned by the copy registry; the circulation service
/// is the only caller permitted to flip it together with loan writes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookCopy {
    /// Unique copy identifier, assigned on creation.
    pub copy_id: i64,
    /// Catalog entry this copy belongs to (non-owning reference).
    pub book_id: i64,
    /// Globally unique barcode.
    pub barcode: String,
    /// Shelf location.
    pub location: Option<String>,
    /// Availability status.
    pub status: CopyStatus,
    /// Date the copy was acquired.
    pub acquisition_date: Option<NaiveDate>,
    /// Purchase price.
    pub acquisition_price: Option<Decimal>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the copy record was created.
    pub created_at: DateTime<Utc>,
    /// When the copy record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a new copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookCopy {
    /// Catalog entry the copy belongs to.
    pub book_id: i64,
    /// Barcode (must be globally unique).
    pub barcode: String,
    /// Shelf location.
    pub location: Option<String>,
    /// Initial status; defaults to `available` when absent.
    pub status: Option<CopyStatus>,
    /// Acquisition date.
    pub acquisition_date: Option<NaiveDate>,
    /// Acquisition price.
    pub acquisition_price: Option<Decimal>,
    /// Notes.
    pub notes: Option<String>,
}

/// Data for updating an existing copy's descriptive fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookCopy {
    /// New barcode (uniqueness re-checked when it changes).
    pub barcode: Option<String>,
    /// New shelf location.
    pub location: Option<String>,
    /// New acquisition date.
    pub acquisition_date: Option<NaiveDate>,
    /// New acquisition price.
    pub acquisition_price: Option<Decimal>,
    /// New notes.
    pub notes: Option<String>,
}
