use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use crate::errors::{response::ApiResponse, AppResult};
use crate::middleware::Gate;
use crate::models::{api::{Empty, LoginResp}, LoginReq};
use crate::services::SessionStore;
use super::{decode, AppState};

pub async fn handle_login(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<ApiResponse<LoginResp>> {
    let req: LoginReq = decode(&body)?;

    let user = state.authenticator
        .login(&req.username, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %req.username, "Login failed");
            e
        })?;

    let token = SessionStore::generate_token();
    let role = user.effective_role();
    state.sessions.add_token(token.clone(), user).await;

    tracing::info!(username = %req.username, %role, "User successfully logged in");
    Ok(ApiResponse(LoginResp { token, role }))
}

// Always succeeds, whether or not the token was live.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResponse<Empty> {
    if let Some(token) = Gate::token(&headers) {
        if let Some(user) = state.sessions.remove_token(token).await {
            tracing::info!(username = %user.username, "User successfully logged out");
        }
    }
    ApiResponse(Empty {})
}
