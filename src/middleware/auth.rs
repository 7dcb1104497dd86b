use axum::http::HeaderMap;
use crate::errors::{AppError, AppResult};
use crate::models::{Role, User};
use crate::services::SessionStore;

// Sent by clients as `AuthorizationToken`.
pub const TOKEN_HEADER: &str = "authorizationtoken";

/// Resolves the session token and checks the caller's role. Every protected
/// handler calls [`Gate::require`] itself with its own minimum role; nothing
/// is remembered between requests.
#[derive(Clone)]
pub struct Gate {
    sessions: SessionStore,
}

impl Gate {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    pub fn token(headers: &HeaderMap) -> Option<&str> {
        headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok())
    }

    pub async fn require(&self, headers: &HeaderMap, min: Role) -> AppResult<User> {
        let token = Self::token(headers).ok_or(AppError::Unauthenticated)?;

        if !self.sessions.check_token(token).await {
            tracing::warn!("An unknown user token was presented");
            return Err(AppError::Unauthenticated);
        }
        // The token may have been removed since the check.
        let user = self.sessions.get_user(token).await.ok_or(AppError::Unauthenticated)?;

        if !user.allowed(min) {
            tracing::warn!(username = %user.username, role = %user.role, required = %min, "Insufficient role");
            return Err(AppError::Forbidden { username: user.username, required: min });
        }
        Ok(user)
    }
}
