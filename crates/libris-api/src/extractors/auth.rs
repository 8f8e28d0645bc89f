//! `AuthUser` extractor — reads the identity headers set by the
//! authenticating front proxy and injects a request context.
//!
//! Identity itself lives outside this service; by the time a request
//! reaches us the proxy has verified the caller and stamped
//! `X-User-Id` (and `X-User-Admin` for staff). A request without the
//! headers never went through the proxy and is rejected.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use libris_core::error::AppError;
use libris_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing X-User-Id header"))?
            .parse::<Uuid>()
            .map_err(|_| AppError::unauthorized("Invalid X-User-Id header"))?;

        let is_admin = parts
            .headers
            .get("x-user-admin")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(AuthUser(RequestContext::new(user_id, is_admin)))
    }
}
