//! HTTP handlers grouped by domain.

pub mod copy;
pub mod health;
pub mod loan;
