use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};
use crate::errors::{response::ApiResponse, AppResult};
use crate::models::{
    api::{Empty, ResListResp, ResResp},
    ResCreateReq, Role, StatusUpdateReq,
};
use super::{decode, AppState};

pub async fn list_resources(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<ResListResp>> {
    state.gate.require(&headers, Role::Standard).await?;

    let resources = state.lifecycle.resources().await;
    for r in &resources {
        tracing::debug!(id = %r.id, name = %r.name, addr = %r.address, "Gathered resource information");
    }

    tracing::info!(count = resources.len(), "Listing of resources provided");
    Ok(ApiResponse(ResListResp { resources }))
}

pub async fn create_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<ApiResponse<Empty>> {
    let user = state.gate.require(&headers, Role::Administrator).await?;
    let req: ResCreateReq = decode(&body)?;
    let name = req.name.clone();
    let addr = req.address.clone();

    let id = state.lifecycle.create_resource(req).await?;

    tracing::info!(%id, %name, %addr, by = %user.username, "Resource successfully added");
    Ok(ApiResponse(Empty {}))
}

pub async fn read_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(res_id): Path<String>,
) -> AppResult<ApiResponse<ResResp>> {
    state.gate.require(&headers, Role::Standard).await?;

    let resource = state.lifecycle.resource(&res_id).await?;

    tracing::info!(name = %resource.name, "Information gathered on resource");
    Ok(ApiResponse(ResResp { resource }))
}

pub async fn update_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(res_id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<ResResp>> {
    let user = state.gate.require(&headers, Role::Administrator).await?;
    let req: StatusUpdateReq = decode(&body)?;

    let resource = state.lifecycle.update_resource(&res_id, &req.status).await?;

    tracing::info!(resource = %res_id, status = %req.status, by = %user.username, "Resource updated");
    Ok(ApiResponse(ResResp { resource }))
}

pub async fn delete_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(res_id): Path<String>,
) -> AppResult<ApiResponse<Empty>> {
    let user = state.gate.require(&headers, Role::Administrator).await?;

    state.lifecycle.delete_resource(&res_id).await?;

    tracing::info!(resource = %res_id, by = %user.username, "Resource disconnected");
    Ok(ApiResponse(Empty {}))
}
