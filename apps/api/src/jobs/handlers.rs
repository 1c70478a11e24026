//! Axum route handlers for the Jobs API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::job::{Job, JobFields};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub message: &'static str,
}

/// POST /jobs
///
/// The owner always comes from the verified token, never the body.
pub async fn handle_create_job(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<JobFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let Json(fields) = body.map_err(|e| AppError::invalid_body(AppError::SERVER_ERROR, e))?;
    let job = state.jobs.create(&user.subject, fields).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /jobs
pub async fn handle_list_jobs(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Job>>, AppError> {
    let jobs = state.jobs.list(&user.subject).await?;
    Ok(Json(jobs))
}

/// PUT /jobs/:id
///
/// Responds `null` when the job does not exist or belongs to someone else.
pub async fn handle_update_job(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<JobFields>, JsonRejection>,
) -> Result<Json<Option<Job>>, AppError> {
    let Json(fields) = body.map_err(|e| AppError::invalid_body(AppError::SERVER_ERROR, e))?;
    let job = state.jobs.update(&user.subject, &id, fields).await?;
    Ok(Json(job))
}

/// DELETE /jobs/:id
pub async fn handle_delete_job(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteJobResponse>, AppError> {
    state.jobs.delete(&user.subject, &id).await?;
    Ok(Json(DeleteJobResponse {
        message: "Job deleted successfully",
    }))
}
