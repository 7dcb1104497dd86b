use async_trait::async_trait;
use crate::errors::QueueResult;
use crate::models::{Job, Resource, Tool};

/// The work queue owns every job, resource and tool record. Each call is
/// atomic from the caller's side; implementations do their own locking.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Every tool offered by at least one connected resource.
    async fn tools(&self) -> Vec<Tool>;

    async fn resources(&self) -> Vec<Resource>;
    /// Connects to the resource and discovers its tools. Returns the new id.
    async fn add_resource(&self, address: &str, name: &str, key: &str) -> QueueResult<String>;
    async fn pause_resource(&self, id: &str) -> QueueResult<()>;
    async fn resume_resource(&self, id: &str) -> QueueResult<()>;
    async fn remove_resource(&self, id: &str) -> QueueResult<()>;

    async fn all_jobs(&self) -> Vec<Job>;
    async fn job_info(&self, id: &str) -> Option<Job>;
    /// Validates and enqueues the job. Returns its id.
    async fn add_job(&self, job: Job) -> QueueResult<String>;
    async fn pause_job(&self, id: &str) -> QueueResult<()>;
    async fn quit_job(&self, id: &str) -> QueueResult<()>;
    async fn remove_job(&self, id: &str) -> QueueResult<()>;
}
