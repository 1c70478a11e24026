use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Which upstream call failed. Each one has its own client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamCall {
    AnalyzeResume,
    MockInterview,
}

impl UpstreamCall {
    pub fn failure_message(self) -> &'static str {
        match self {
            UpstreamCall::AnalyzeResume => "AI analysis failed",
            UpstreamCall::MockInterview => "AI mock interview generation failed",
        }
    }
}

impl std::fmt::Display for UpstreamCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamCall::AnalyzeResume => f.write_str("analyze-resume"),
            UpstreamCall::MockInterview => f.write_str("mock-interview"),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Clients only ever see 401 or 500 with a fixed message; the cause is logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Upstream error during {call}: {source}")]
    Upstream {
        call: UpstreamCall,
        #[source]
        source: LlmError,
    },

    /// The request body was missing, not JSON, or the wrong shape.
    /// `message` is the route's generic failure text.
    #[error("Invalid request body: {source}")]
    InvalidBody {
        message: &'static str,
        #[source]
        source: JsonRejection,
    },
}

impl AppError {
    /// Generic failure text for the job routes.
    pub const SERVER_ERROR: &'static str = "Server error";

    pub fn invalid_body(message: &'static str, source: JsonRejection) -> Self {
        AppError::InvalidBody { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, AppError::SERVER_ERROR)
            }
            AppError::Upstream { call, source } => {
                tracing::error!("Upstream error during {call}: {source}");
                (StatusCode::INTERNAL_SERVER_ERROR, call.failure_message())
            }
            AppError::InvalidBody { message, source } => {
                tracing::warn!("Rejected request body: {source}");
                (StatusCode::INTERNAL_SERVER_ERROR, *message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
