use axum::body::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use crate::errors::{AppError, AppResult};
use crate::middleware::Gate;
use crate::services::{Authenticator, Lifecycle, SessionStore};

mod auth;
mod tools;
mod jobs;
mod resources;
#[cfg(test)]
mod tests;

pub use auth::{handle_login, handle_logout};
pub use tools::{list_tools, get_tool};
pub use jobs::{list_jobs, create_job, read_job, update_job, delete_job};
pub use resources::{list_resources, create_resource, read_resource, update_resource, delete_resource};

// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub gate: Gate,
    pub authenticator: Arc<dyn Authenticator>,
    pub lifecycle: Lifecycle,
}

impl AppState {
    pub fn new(
        sessions: SessionStore,
        authenticator: Arc<dyn Authenticator>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            gate: Gate::new(sessions.clone()),
            sessions,
            authenticator,
            lifecycle,
        }
    }
}

// Bodies are decoded by hand, after the gate, so that an unauthenticated
// request is rejected before its body is looked at.
fn decode<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Unable to decode request body: {}", e);
        AppError::BadRequest(e.to_string())
    })
}
