//! Loan record status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a loan record.
///
/// Normal flow only ever transitions `checked_out -> returned`; the
/// reverse direction exists solely as an administrative override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "loan_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// The copy is out with the borrower.
    CheckedOut,
    /// The copy has been returned; `return_date` is set.
    Returned,
}

impl LoanStatus {
    /// Return the status as its snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckedOut => "checked_out",
            Self::Returned => "returned",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = libris_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checked_out" => Ok(Self::CheckedOut),
            "returned" => Ok(Self::Returned),
            _ => Err(libris_core::AppError::validation(format!(
                "Invalid loan status: '{s}'. Expected one of: checked_out, returned"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        assert_eq!(
            "checked_out".parse::<LoanStatus>().unwrap(),
            LoanStatus::CheckedOut
        );
        assert_eq!("returned".parse::<LoanStatus>().unwrap(), LoanStatus::Returned);
    }

    #[test]
    fn test_unknown_string_rejected() {
        assert!("overdue".parse::<LoanStatus>().is_err());
    }
}
