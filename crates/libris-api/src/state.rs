//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use libris_core::config::AppConfig;
use libris_database::repositories::{
    BookRepository, CopyRepository, LoanRepository, UserRepository,
};
use libris_service::circulation::CirculationService;
use libris_service::copies::CopyService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // Repositories
    pub users: Arc<UserRepository>,
    pub books: Arc<BookRepository>,
    pub copies: Arc<CopyRepository>,
    pub loans: Arc<LoanRepository>,

    // Services
    pub circulation: Arc<CirculationService>,
    pub copy_service: Arc<CopyService>,
}
