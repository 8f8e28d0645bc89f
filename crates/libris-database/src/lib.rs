//! # libris-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all Libris entities.

pub mod connection;
pub mod migration;
pub mod repositories;
