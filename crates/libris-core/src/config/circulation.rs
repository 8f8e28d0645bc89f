//! Circulation policy configuration.

use serde::{Deserialize, Serialize};

/// Lending policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CirculationConfig {
    /// Loan period in days, applied to every borrow.
    #[serde(default = "default_loan_period_days")]
    pub loan_period_days: i64,
    /// Whether an administrative override that reopens a returned loan
    /// (`returned` back to `checked_out`) also flips the copy back to
    /// `checked_out`. When false the override writes the record only and
    /// leaves the copy untouched.
    #[serde(default)]
    pub reopen_updates_copy: bool,
}

impl Default for CirculationConfig {
    fn default() -> Self {
        Self {
            loan_period_days: default_loan_period_days(),
            reopen_updates_copy: false,
        }
    }
}

fn default_loan_period_days() -> i64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CirculationConfig::default();
        assert_eq!(config.loan_period_days, 30);
        assert!(!config.reopen_updates_copy);
    }
}
