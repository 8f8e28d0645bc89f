//! Request context carrying the resolved caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use libris_core::AppError;

/// Identity for the current request.
///
/// Resolved by the adapter layer (gateway/session handling lives there)
/// and passed into every service method explicitly, so that each
/// operation knows *who* is acting without any ambient state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// Whether the caller holds administrator privileges.
    pub is_admin: bool,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, is_admin: bool) -> Self {
        Self {
            user_id,
            is_admin,
            request_time: Utc::now(),
        }
    }

    /// Fails with `Forbidden` unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "This operation requires administrator privileges",
            ))
        }
    }

    /// Whether the caller may see records owned by the given user.
    pub fn can_view_records_of(&self, owner_id: Uuid) -> bool {
        self.is_admin || self.user_id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        let user = RequestContext::new(Uuid::new_v4(), false);
        assert!(user.require_admin().is_err());

        let admin = RequestContext::new(Uuid::new_v4(), true);
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn test_can_view_records() {
        let owner = Uuid::new_v4();
        let user = RequestContext::new(owner, false);
        assert!(user.can_view_records_of(owner));
        assert!(!user.can_view_records_of(Uuid::new_v4()));

        let admin = RequestContext::new(Uuid::new_v4(), true);
        assert!(admin.can_view_records_of(owner));
    }
}
