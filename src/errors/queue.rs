use thiserror::Error;
use crate::models::JobStatus;

/// Failures reported by the work queue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid job parameters: {0}")]
    InvalidParams(String),

    #[error("Tool {0} has a malformed parameter payload: {1}")]
    MalformedTool(String, String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Cannot {action} a job that is {from}")]
    InvalidTransition { from: JobStatus, action: &'static str },

    #[error("Resource {0} still has {1} active job(s)")]
    ResourceBusy(String, usize),

    #[error("Connection to {0} failed: {1}")]
    Connection(String, String),

    #[error("Queue is at capacity ({0} jobs)")]
    AtCapacity(usize),
}

pub type QueueResult<T> = Result<T, QueueError>;
