use serde::{Deserialize, Serialize};

/// A cracking tool as stored by the work queue. `parameters` holds the raw
/// `{"form": ..., "schema": ...}` payload supplied by the remote resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub version: String,
    pub parameters: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub address: String,
    pub key: String,
    pub paused: bool,
    pub tools: Vec<Tool>,
}

impl Resource {
    pub fn status(&self) -> &'static str {
        if self.paused { "paused" } else { "running" }
    }

    pub fn has_tool(&self, tool_id: &str) -> bool {
        self.tools.iter().any(|t| t.id == tool_id)
    }
}
