// Wire projections. Nothing here is cached; every value is built from a
// fresh work queue read.
use serde::Serialize;
use serde_json::{Map, Value};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use super::{Job, JobStatus, Resource, Tool};

/// `{status, message, ...payload}` wrapper carried by every response.
#[derive(Serialize, Debug)]
pub struct Envelope<T: Serialize> {
    pub status: u16,
    pub message: String,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Serialize, Debug, Default)]
pub struct Empty {}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct APITool {
    pub id: String,
    pub name: String,
    pub version: String,
}

impl From<&Tool> for APITool {
    fn from(t: &Tool) -> Self {
        Self { id: t.id.clone(), name: t.name.clone(), version: t.version.clone() }
    }
}

#[derive(Serialize, Debug)]
pub struct APIToolDetail {
    pub id: String,
    pub name: String,
    pub version: String,
    pub form: Value,
    pub schema: Value,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct APIJob {
    pub id: String,
    pub name: String,
    pub status: JobStatus,
    pub resource_id: Option<String>,
    pub owner: String,
    pub start_time: DateTime<Utc>,
    pub cracked_hashes: u64,
    pub total_hashes: u64,
    pub progress: f64,
    pub tool_id: String,
}

impl From<&Job> for APIJob {
    fn from(j: &Job) -> Self {
        Self {
            id: j.id.clone(),
            name: j.name.clone(),
            status: j.status,
            resource_id: j.resource_id.clone(),
            owner: j.owner.clone(),
            start_time: j.start_time,
            cracked_hashes: j.cracked_hashes,
            total_hashes: j.total_hashes,
            progress: j.progress,
            tool_id: j.tool_id.clone(),
        }
    }
}

/// Single-job read: the summary plus parameters and tool output.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct APIJobDetail {
    #[serde(flatten)]
    pub summary: APIJob,
    pub params: Map<String, Value>,
    pub performance_title: String,
    pub performance_data: HashMap<String, String>,
    pub output_titles: Vec<String>,
    pub output_data: Vec<Vec<String>>,
}

impl From<&Job> for APIJobDetail {
    fn from(j: &Job) -> Self {
        Self {
            summary: APIJob::from(j),
            params: j.params.clone(),
            performance_title: j.performance_title.clone(),
            performance_data: j.performance_data.clone(),
            output_titles: j.output_titles.clone(),
            output_data: j.output_data.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct APIResource {
    pub id: String,
    pub name: String,
    pub address: String,
    pub status: String,
    pub tools: Vec<APITool>,
}

impl From<&Resource> for APIResource {
    fn from(r: &Resource) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            address: r.address.clone(),
            status: r.status().to_string(),
            tools: r.tools.iter().map(APITool::from).collect(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct LoginResp {
    pub token: String,
    pub role: String,
}

#[derive(Serialize, Debug)]
pub struct ToolsResp {
    pub tools: Vec<APITool>,
}

#[derive(Serialize, Debug)]
pub struct ToolResp {
    pub tool: APIToolDetail,
}

#[derive(Serialize, Debug)]
pub struct JobsResp {
    pub jobs: Vec<APIJob>,
}

#[derive(Serialize, Debug)]
pub struct JobCreateResp {
    pub jobid: String,
}

#[derive(Serialize, Debug)]
pub struct JobResp<J: Serialize> {
    pub job: J,
}

#[derive(Serialize, Debug)]
pub struct ResListResp {
    pub resources: Vec<APIResource>,
}

#[derive(Serialize, Debug)]
pub struct ResResp {
    pub resource: APIResource,
}
