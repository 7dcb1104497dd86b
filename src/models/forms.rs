use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreateReq {
    pub tool_id: String,
    pub name: String,
    pub params: Map<String, Value>,
}

/// Body of `PUT /api/jobs/{id}` and `PUT /api/resources/{id}`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateReq {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ResCreateReq {
    pub address: String,
    pub name: String,
    pub key: String,
}
