//! # libris-service
//!
//! Business logic for Libris. The circulation service is the only
//! component permitted to touch both the copy registry and the loan
//! ledger inside one transaction, and the sole enforcer of the
//! one-active-loan-per-copy invariant.

pub mod circulation;
pub mod context;
pub mod copies;

pub use context::RequestContext;
