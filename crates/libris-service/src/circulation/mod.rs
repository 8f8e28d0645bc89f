//! Circulation orchestration: borrow, return, administrative override,
//! and ledger queries.

pub mod patch;
pub mod service;
pub mod view;

pub use service::CirculationService;
pub use view::LoanView;
