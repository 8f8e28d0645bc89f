//! Book copy status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Availability status of a physical book copy.
///
/// This is a closed set: any other string is a validation error at the
/// boundary, never a new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "copy_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    /// On the shelf and lendable.
    Available,
    /// Currently lent out; exactly one active loan record references the copy.
    CheckedOut,
    /// Reported lost.
    Lost,
    /// Damaged and pulled from circulation.
    Damaged,
    /// Permanently withdrawn from the collection.
    Withdrawn,
}

impl CopyStatus {
    /// Check whether a borrow may start from this status.
    pub fn is_lendable(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Return the status as its snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::CheckedOut => "checked_out",
            Self::Lost => "lost",
            Self::Damaged => "damaged",
            Self::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CopyStatus {
    type Err = libris_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "checked_out" => Ok(Self::CheckedOut),
            "lost" => Ok(Self::Lost),
            "damaged" => Ok(Self::Damaged),
            "withdrawn" => Ok(Self::Withdrawn),
            _ => Err(libris_core::AppError::validation(format!(
                "Invalid copy status: '{s}'. Expected one of: available, checked_out, lost, damaged, withdrawn"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_variants() {
        for status in [
            CopyStatus::Available,
            CopyStatus::CheckedOut,
            CopyStatus::Lost,
            CopyStatus::Damaged,
            CopyStatus::Withdrawn,
        ] {
            assert_eq!(status.as_str().parse::<CopyStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_string_rejected() {
        let err = "on_loan".parse::<CopyStatus>().unwrap_err();
        assert_eq!(err.kind, libris_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_only_available_is_lendable() {
        assert!(CopyStatus::Available.is_lendable());
        assert!(!CopyStatus::CheckedOut.is_lendable());
        assert!(!CopyStatus::Withdrawn.is_lendable());
    }
}
