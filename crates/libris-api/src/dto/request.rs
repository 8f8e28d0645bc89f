//! Request DTOs with validation.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use libris_core::AppResult;
use libris_entity::copy::{CopyStatus, CreateBookCopy, UpdateBookCopy};
use libris_entity::loan::{LoanPatch, LoanStatus};

/// Borrow request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowRequest {
    /// Copy to check out.
    pub copy_id: i64,
}

/// Administrative loan override request body.
///
/// Status arrives as a string so an unknown value surfaces as a
/// validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUpdateLoanRequest {
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New return date.
    pub return_date: Option<DateTime<Utc>>,
    /// New status (`checked_out` or `returned`).
    pub status: Option<String>,
}

impl AdminUpdateLoanRequest {
    /// Parse into a domain patch.
    pub fn into_patch(self) -> AppResult<LoanPatch> {
        let status = self
            .status
            .as_deref()
            .map(LoanStatus::from_str)
            .transpose()?;
        Ok(LoanPatch {
            due_date: self.due_date,
            return_date: self.return_date,
            status,
        })
    }
}

/// Query parameters for the admin loan listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanListParams {
    /// Filter by borrower.
    pub user_id: Option<uuid::Uuid>,
    /// Filter by status (`checked_out` or `returned`).
    pub status: Option<String>,
    /// Loans borrowed at or after this instant.
    pub borrowed_from: Option<DateTime<Utc>>,
    /// Loans borrowed at or before this instant.
    pub borrowed_until: Option<DateTime<Utc>>,
}

/// Register copy request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCopyRequest {
    /// Catalog entry the copy belongs to.
    pub book_id: i64,
    /// Barcode.
    #[validate(length(min = 1, max = 64, message = "Barcode must be 1-64 characters"))]
    pub barcode: String,
    /// Shelf location.
    pub location: Option<String>,
    /// Initial status; defaults to `available`.
    pub status: Option<String>,
    /// Acquisition date.
    pub acquisition_date: Option<NaiveDate>,
    /// Acquisition price.
    pub acquisition_price: Option<Decimal>,
    /// Notes.
    pub notes: Option<String>,
}

impl CreateCopyRequest {
    pub fn into_create(self) -> AppResult<CreateBookCopy> {
        let status = self
            .status
            .as_deref()
            .map(CopyStatus::from_str)
            .transpose()?;
        Ok(CreateBookCopy {
            book_id: self.book_id,
            barcode: self.barcode,
            location: self.location,
            status,
            acquisition_date: self.acquisition_date,
            acquisition_price: self.acquisition_price,
            notes: self.notes,
        })
    }
}

/// Update copy request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCopyRequest {
    /// New barcode.
    #[validate(length(min = 1, max = 64, message = "Barcode must be 1-64 characters"))]
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

impl UpdateCopyRequest {
    pub fn into_update(self) -> UpdateBookCopy {
        UpdateBookCopy {
            barcode: self.barcode,
            location: self.location,
            acquisition_date: self.acquisition_date,
            acquisition_price: self.acquisition_price,
            notes: self.notes,
        }
    }
}

/// Direct status change request (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCopyStatusRequest {
    /// Target status.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_loan_status_rejected() {
        let req = AdminUpdateLoanRequest {
            due_date: None,
            return_date: None,
            status: Some("lost".to_string()),
        };
        assert!(req.into_patch().is_err());
    }

    #[test]
    fn test_known_loan_status_parses() {
        let req = AdminUpdateLoanRequest {
            due_date: None,
            return_date: None,
            status: Some("returned".to_string()),
        };
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.status, Some(LoanStatus::Returned));
    }
}
