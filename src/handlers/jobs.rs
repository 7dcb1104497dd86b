use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};
use crate::errors::{response::ApiResponse, AppResult};
use crate::models::{
    api::{APIJob, APIJobDetail, Empty, JobCreateResp, JobResp, JobsResp},
    JobCreateReq, Role, StatusUpdateReq,
};
use super::{decode, AppState};

pub async fn list_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<JobsResp>> {
    state.gate.require(&headers, Role::ReadOnly).await?;

    let jobs = state.lifecycle.jobs().await;
    for j in &jobs {
        tracing::debug!(uuid = %j.id, name = %j.name, status = %j.status, "Gathered job for listing");
    }
    Ok(ApiResponse(JobsResp { jobs }))
}

pub async fn create_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<ApiResponse<JobCreateResp>> {
    let user = state.gate.require(&headers, Role::Standard).await?;
    let req: JobCreateReq = decode(&body)?;
    let name = req.name.clone();

    let jobid = state.lifecycle.create_job(&user, req).await?;

    tracing::info!(uuid = %jobid, %name, owner = %user.username, "New job created");
    Ok(ApiResponse(JobCreateResp { jobid }))
}

pub async fn read_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> AppResult<ApiResponse<JobResp<APIJobDetail>>> {
    state.gate.require(&headers, Role::ReadOnly).await?;

    let job = state.lifecycle.job(&job_id).await?;

    tracing::info!(uuid = %job.summary.id, name = %job.summary.name, "Job detailed information gathered");
    Ok(ApiResponse(JobResp { job }))
}

pub async fn update_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<JobResp<APIJob>>> {
    let user = state.gate.require(&headers, Role::Standard).await?;
    let req: StatusUpdateReq = decode(&body)?;

    let job = state.lifecycle.update_job(&job_id, &req.status).await?;

    tracing::info!(
        uuid = %job.id,
        name = %job.name,
        status = %job.status,
        by = %user.username,
        "Job information updated"
    );
    Ok(ApiResponse(JobResp { job }))
}

pub async fn delete_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> AppResult<ApiResponse<Empty>> {
    let user = state.gate.require(&headers, Role::Standard).await?;

    state.lifecycle.delete_job(&job_id).await?;

    tracing::info!(jobid = %job_id, by = %user.username, "Job deleted");
    Ok(ApiResponse(Empty {}))
}
