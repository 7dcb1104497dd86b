use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use crate::errors::{AppError, AppResult, QueueError};
use crate::models::api::{APIJob, APIJobDetail, APIResource, APITool, APIToolDetail};
use crate::models::{Job, JobCreateReq, ResCreateReq, User};
use super::WorkQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Pause,
    Quit,
}

impl JobAction {
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "pause" => Some(JobAction::Pause),
            "quit" => Some(JobAction::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    Pause,
    Resume,
}

impl ResourceAction {
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "pause" => Some(ResourceAction::Pause),
            "resume" => Some(ResourceAction::Resume),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ToolParameters {
    form: Value,
    schema: Value,
}

// Missing records are NotFound; any other queue failure stays a server error.
fn queue_failure(e: QueueError) -> AppError {
    match e {
        QueueError::JobNotFound(id) => AppError::NotFound(format!("job {}", id)),
        QueueError::ResourceNotFound(id) => AppError::NotFound(format!("resource {}", id)),
        other => AppError::Queue(other),
    }
}

/// Turns authorized requests into work queue calls and projects the
/// resulting state. Callers must have passed the authorization gate.
#[derive(Clone)]
pub struct Lifecycle {
    queue: Arc<dyn WorkQueue>,
}

impl Lifecycle {
    pub fn new(queue: Arc<dyn WorkQueue>) -> Self {
        Self { queue }
    }

    pub async fn tools(&self) -> Vec<APITool> {
        self.queue.tools().await.iter().map(APITool::from).collect()
    }

    /// Fetches one tool and splits its stored payload into form and schema.
    pub async fn tool(&self, id: &str) -> AppResult<APIToolDetail> {
        let tool = self.queue.tools().await
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("tool {}", id)))?;

        let params: ToolParameters = serde_json::from_str(&tool.parameters)
            .map_err(|e| AppError::Internal(format!("Malformed parameters for tool {}: {}", id, e)))?;

        Ok(APIToolDetail {
            id: tool.id,
            name: tool.name,
            version: tool.version,
            form: params.form,
            schema: params.schema,
        })
    }

    pub async fn jobs(&self) -> Vec<APIJob> {
        self.queue.all_jobs().await.iter().map(APIJob::from).collect()
    }

    pub async fn job(&self, id: &str) -> AppResult<APIJobDetail> {
        self.queue.job_info(id).await
            .map(|j| APIJobDetail::from(&j))
            .ok_or_else(|| AppError::NotFound(format!("job {}", id)))
    }

    pub async fn create_job(&self, owner: &User, req: JobCreateReq) -> AppResult<String> {
        let job = Job::new(req.tool_id, req.name, owner.username.clone(), req.params);
        tracing::debug!(job = %job.id, tool = %job.tool_id, owner = %owner.username, "Submitting job");

        self.queue.add_job(job).await.map_err(|e| match e {
            QueueError::UnknownTool(_) | QueueError::InvalidParams(_) => {
                AppError::BadRequest(e.to_string())
            }
            other => queue_failure(other),
        })
    }

    /// Applies a `pause`/`quit` request. Any other status string changes
    /// nothing and still reports the job's current state.
    pub async fn update_job(&self, id: &str, status: &str) -> AppResult<APIJob> {
        match JobAction::parse(status) {
            Some(JobAction::Pause) => self.queue.pause_job(id).await.map_err(queue_failure)?,
            Some(JobAction::Quit) => self.queue.quit_job(id).await.map_err(queue_failure)?,
            None => tracing::warn!(job = id, status, "Ignoring unrecognized job status"),
        }

        self.queue.job_info(id).await
            .map(|j| APIJob::from(&j))
            .ok_or_else(|| AppError::NotFound(format!("job {}", id)))
    }

    pub async fn delete_job(&self, id: &str) -> AppResult<()> {
        self.queue.remove_job(id).await.map_err(queue_failure)
    }

    pub async fn resources(&self) -> Vec<APIResource> {
        self.queue.resources().await.iter().map(APIResource::from).collect()
    }

    pub async fn resource(&self, id: &str) -> AppResult<APIResource> {
        self.queue.resources().await
            .iter()
            .find(|r| r.id == id)
            .map(APIResource::from)
            .ok_or_else(|| AppError::NotFound(format!("resource {}", id)))
    }

    pub async fn create_resource(&self, req: ResCreateReq) -> AppResult<String> {
        if req.address.trim().is_empty() || req.name.trim().is_empty() {
            return Err(AppError::BadRequest("address and name are required".into()));
        }
        self.queue.add_resource(&req.address, &req.name, &req.key).await.map_err(queue_failure)
    }

    /// Applies a `pause`/`resume` request; unrecognized strings are ignored.
    pub async fn update_resource(&self, id: &str, status: &str) -> AppResult<APIResource> {
        match ResourceAction::parse(status) {
            Some(ResourceAction::Pause) => self.queue.pause_resource(id).await.map_err(queue_failure)?,
            Some(ResourceAction::Resume) => {
                self.queue.resume_resource(id).await.map_err(|e| {
                    tracing::error!(resource = id, error = %e, "Failed to resume resource");
                    queue_failure(e)
                })?
            }
            None => tracing::warn!(resource = id, status, "Ignoring unrecognized resource status"),
        }
        self.resource(id).await
    }

    pub async fn delete_resource(&self, id: &str) -> AppResult<()> {
        self.queue.remove_resource(id).await.map_err(queue_failure)
    }
}
