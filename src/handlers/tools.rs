use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use crate::errors::{response::ApiResponse, AppResult};
use crate::models::{api::{ToolResp, ToolsResp}, Role};
use super::AppState;

pub async fn list_tools(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<ToolsResp>> {
    state.gate.require(&headers, Role::Standard).await?;

    let tools = state.lifecycle.tools().await;
    for t in &tools {
        tracing::debug!(uuid = %t.id, name = %t.name, ver = %t.version, "Gathered tool");
    }

    tracing::info!(count = tools.len(), "Provided a tool listing");
    Ok(ApiResponse(ToolsResp { tools }))
}

pub async fn get_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(tool_id): Path<String>,
) -> AppResult<ApiResponse<ToolResp>> {
    state.gate.require(&headers, Role::Standard).await?;

    let tool = state.lifecycle.tool(&tool_id).await?;

    tracing::info!(name = %tool.name, ver = %tool.version, "Detailed tool information sent");
    Ok(ApiResponse(ToolResp { tool }))
}
