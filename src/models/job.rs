use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Job states as reported by the work queue. `Done` and `Failed` are set
/// by the queue from worker progress, never by a client request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Created,
    Running,
    Paused,
    Quit,
    Done,
    Failed,
}

impl JobStatus {
    /// Terminal jobs accept no further pause or quit.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Quit | JobStatus::Done | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Created => write!(f, "created"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Paused => write!(f, "paused"),
            JobStatus::Quit => write!(f, "quit"),
            JobStatus::Done => write!(f, "done"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub tool_id: String,
    pub params: Map<String, Value>,
    pub status: JobStatus,
    pub resource_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub cracked_hashes: u64,
    pub total_hashes: u64,
    pub progress: f64,
    pub performance_title: String,
    pub performance_data: HashMap<String, String>,
    pub output_titles: Vec<String>,
    pub output_data: Vec<Vec<String>>,
}

impl Job {
    pub fn new(
        tool_id: impl Into<String>,
        name: impl Into<String>,
        owner: impl Into<String>,
        params: Map<String, Value>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            owner: owner.into(),
            tool_id: tool_id.into(),
            params,
            status: JobStatus::Created,
            resource_id: None,
            start_time: Utc::now(),
            cracked_hashes: 0,
            total_hashes: 0,
            progress: 0.0,
            performance_title: String::new(),
            performance_data: HashMap::new(),
            output_titles: Vec::new(),
            output_data: Vec::new(),
        }
    }
}
