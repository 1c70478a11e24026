//! Axum route handlers for the AI proxy endpoints.
//!
//! Each handler builds one prompt, makes one upstream call, and relays the
//! upstream JSON untouched.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::errors::{AppError, UpstreamCall};
use crate::llm_client::prompts::{
    analyze_resume_prompt, mock_interview_prompt, ANALYZE_RESUME_MAX_TOKENS, MISSING_INPUT,
    MOCK_INTERVIEW_MAX_TOKENS,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeRequest {
    pub resume_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockInterviewRequest {
    pub job_role: Option<String>,
}

/// POST /analyze-resume
pub async fn handle_analyze_resume(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<AnalyzeResumeRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let call = UpstreamCall::AnalyzeResume;
    let Json(request) = body.map_err(|e| AppError::invalid_body(call.failure_message(), e))?;
    let prompt = analyze_resume_prompt(request.resume_text.as_deref().unwrap_or(MISSING_INPUT));
    tracing::info!(subject = %user.subject, "Requesting resume analysis");

    let payload = state
        .llm
        .complete(&prompt, ANALYZE_RESUME_MAX_TOKENS)
        .await
        .map_err(|source| AppError::Upstream { call, source })?;

    Ok(Json(payload))
}

/// POST /mock-interview
pub async fn handle_mock_interview(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<MockInterviewRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let call = UpstreamCall::MockInterview;
    let Json(request) = body.map_err(|e| AppError::invalid_body(call.failure_message(), e))?;
    let prompt = mock_interview_prompt(request.job_role.as_deref().unwrap_or(MISSING_INPUT));
    tracing::info!(subject = %user.subject, "Requesting mock interview");

    let payload = state
        .llm
        .complete(&prompt, MOCK_INTERVIEW_MAX_TOKENS)
        .await
        .map_err(|source| AppError::Upstream { call, source })?;

    Ok(Json(payload))
}
