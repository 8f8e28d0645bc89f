//! Borrower directory repository.
//!
//! Account management and authentication live outside the circulation
//! core; this repository only resolves user rows for existence checks and
//! response enrichment.

use sqlx::PgPool;
use uuid::Uuid;

use libris_core::error::{AppError, ErrorKind};
use libris_core::result::AppResult;
use libris_entity::user::User;

/// Read-only repository over the borrower directory.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Check whether a user exists.
    pub async fn exists(&self, user_id: Uuid) -> AppResult<bool> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check user existence", e)
            })?;
        Ok(found.is_some())
    }
}
