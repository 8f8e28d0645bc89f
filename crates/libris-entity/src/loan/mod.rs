//! Loan ledger entities.

pub mod detail;
pub mod filter;
pub mod model;
pub mod status;

pub use detail::LoanDetail;
pub use filter::LoanFilter;
pub use model::{CreateLoan, LoanPatch, LoanRecord};
pub use status::LoanStatus;
