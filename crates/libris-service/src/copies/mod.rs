//! Copy registry management.

pub mod service;

pub use service::CopyService;
