use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::errors::{QueueError, QueueResult};
use crate::models::{Job, JobStatus, Resource, Tool};
use super::{ResourceConnector, WorkQueue};

#[derive(Default)]
struct QueueState {
    jobs: Vec<Job>,
    resources: Vec<Resource>,
}

/// In-process work queue. Jobs and resources are kept in insertion order
/// behind a single lock.
pub struct LocalQueue {
    state: RwLock<QueueState>,
    connector: Arc<dyn ResourceConnector>,
    max_jobs: usize,
}

impl LocalQueue {
    pub fn new(connector: Arc<dyn ResourceConnector>, max_jobs: usize) -> Self {
        Self {
            state: RwLock::new(QueueState::default()),
            connector,
            max_jobs,
        }
    }

    /// Updates cracking progress; a job whose cracked count reaches a
    /// non-zero total is done.
    #[cfg(test)]
    pub async fn record_progress(&self, id: &str, cracked: u64, total: u64) -> QueueResult<()> {
        let mut state = self.state.write().await;
        let job = find_job_mut(&mut state.jobs, id)?;
        job.cracked_hashes = cracked;
        job.total_hashes = total;
        if total > 0 {
            job.progress = cracked as f64 / total as f64 * 100.0;
            if cracked >= total {
                job.status = JobStatus::Done;
            }
        }
        Ok(())
    }
}

fn find_job_mut<'a>(jobs: &'a mut [Job], id: &str) -> QueueResult<&'a mut Job> {
    jobs.iter_mut()
        .find(|j| j.id == id)
        .ok_or_else(|| QueueError::JobNotFound(id.to_string()))
}

fn find_resource_mut<'a>(resources: &'a mut [Resource], id: &str) -> QueueResult<&'a mut Resource> {
    resources.iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| QueueError::ResourceNotFound(id.to_string()))
}

// Checks the job parameters against the `required` list of the tool schema.
fn validate_params(tool: &Tool, params: &Map<String, Value>) -> QueueResult<()> {
    let payload: Value = serde_json::from_str(&tool.parameters)
        .map_err(|e| QueueError::MalformedTool(tool.id.clone(), e.to_string()))?;

    let required = payload
        .get("schema")
        .and_then(|s| s.get("required"))
        .and_then(Value::as_array);

    if let Some(required) = required {
        let missing: Vec<&str> = required
            .iter()
            .filter_map(Value::as_str)
            .filter(|key| !params.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(QueueError::InvalidParams(format!("missing {}", missing.join(", "))));
        }
    }
    Ok(())
}

#[async_trait]
impl WorkQueue for LocalQueue {
    async fn tools(&self) -> Vec<Tool> {
        let state = self.state.read().await;
        let mut tools: Vec<Tool> = Vec::new();
        for tool in state.resources.iter().flat_map(|r| r.tools.iter()) {
            if !tools.iter().any(|t| t.id == tool.id) {
                tools.push(tool.clone());
            }
        }
        tools
    }

    async fn resources(&self) -> Vec<Resource> {
        self.state.read().await.resources.clone()
    }

    async fn add_resource(&self, address: &str, name: &str, key: &str) -> QueueResult<String> {
        // No lock is held while the remote side is contacted.
        let tools = self.connector.connect(address, key).await?;

        let resource = Resource {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            address: address.to_string(),
            key: key.to_string(),
            paused: false,
            tools,
        };
        let id = resource.id.clone();
        tracing::debug!(resource = %id, tools = resource.tools.len(), "Resource connected");

        self.state.write().await.resources.push(resource);
        Ok(id)
    }

    async fn pause_resource(&self, id: &str) -> QueueResult<()> {
        let mut state = self.state.write().await;
        find_resource_mut(&mut state.resources, id)?.paused = true;
        Ok(())
    }

    async fn resume_resource(&self, id: &str) -> QueueResult<()> {
        let mut state = self.state.write().await;
        find_resource_mut(&mut state.resources, id)?.paused = false;
        Ok(())
    }

    async fn remove_resource(&self, id: &str) -> QueueResult<()> {
        let mut state = self.state.write().await;
        if !state.resources.iter().any(|r| r.id == id) {
            return Err(QueueError::ResourceNotFound(id.to_string()));
        }

        let active = state.jobs.iter()
            .filter(|j| j.resource_id.as_deref() == Some(id))
            .filter(|j| matches!(j.status, JobStatus::Running | JobStatus::Paused))
            .count();
        if active > 0 {
            return Err(QueueError::ResourceBusy(id.to_string(), active));
        }

        state.resources.retain(|r| r.id != id);
        Ok(())
    }

    async fn all_jobs(&self) -> Vec<Job> {
        self.state.read().await.jobs.clone()
    }

    async fn job_info(&self, id: &str) -> Option<Job> {
        self.state.read().await.jobs.iter().find(|j| j.id == id).cloned()
    }

    async fn add_job(&self, mut job: Job) -> QueueResult<String> {
        let mut state = self.state.write().await;
        if state.jobs.len() >= self.max_jobs {
            return Err(QueueError::AtCapacity(self.max_jobs));
        }

        let tool = state.resources.iter()
            .flat_map(|r| r.tools.iter())
            .find(|t| t.id == job.tool_id)
            .ok_or_else(|| QueueError::UnknownTool(job.tool_id.clone()))?;
        validate_params(tool, &job.params)?;

        match state.resources.iter().find(|r| !r.paused && r.has_tool(&job.tool_id)) {
            Some(resource) => {
                job.resource_id = Some(resource.id.clone());
                job.status = JobStatus::Running;
            }
            None => {
                job.resource_id = None;
                job.status = JobStatus::Created;
            }
        }

        let id = job.id.clone();
        state.jobs.push(job);
        Ok(id)
    }

    async fn pause_job(&self, id: &str) -> QueueResult<()> {
        let mut state = self.state.write().await;
        let job = find_job_mut(&mut state.jobs, id)?;
        match job.status {
            JobStatus::Created | JobStatus::Running => {
                job.status = JobStatus::Paused;
                Ok(())
            }
            from => Err(QueueError::InvalidTransition { from, action: "pause" }),
        }
    }

    async fn quit_job(&self, id: &str) -> QueueResult<()> {
        let mut state = self.state.write().await;
        let job = find_job_mut(&mut state.jobs, id)?;
        if job.status.is_terminal() {
            return Err(QueueError::InvalidTransition { from: job.status, action: "quit" });
        }
        job.status = JobStatus::Quit;
        Ok(())
    }

    async fn remove_job(&self, id: &str) -> QueueResult<()> {
        let mut state = self.state.write().await;
        let job = find_job_mut(&mut state.jobs, id)?;
        if job.status == JobStatus::Running {
            return Err(QueueError::InvalidTransition { from: job.status, action: "delete" });
        }
        state.jobs.retain(|j| j.id != id);
        Ok(())
    }
}
