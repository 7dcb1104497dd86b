use thiserror::Error;
use crate::models::Role;

pub mod response;
pub mod queue;

pub use queue::{QueueError, QueueResult};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Missing or unknown session token")]
    Unauthenticated,

    // Shares the Unauthenticated wire code; kept apart for logging.
    #[error("User {username} lacks role {required}")]
    Forbidden { username: String, required: Role },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;
