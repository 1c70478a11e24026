//! Identity verification: bearer token in, subject id out.
//!
//! `AppState` holds an `Arc<dyn TokenVerifier>`; the `AuthUser` extractor runs
//! it on every request before the body is read. Nothing is remembered between
//! requests.

pub mod firebase;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

/// Reasons a credential was refused. Logged, never shown to the client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("malformed Authorization header")]
    MalformedHeader,

    #[error("token header has no key id")]
    MissingKid,

    #[error("unsupported signing algorithm {0:?}")]
    UnsupportedAlgorithm(jsonwebtoken::Algorithm),

    #[error("no signing key with id {0}")]
    KeyNotFound(String),

    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token subject is empty or too long")]
    InvalidSubject,
}

/// Confirms a bearer credential and yields the caller's subject id.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// The verified caller. Taking this as a handler argument makes the route
/// authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub subject: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = extract_bearer(&parts.headers).map_err(|e| {
            debug!("Rejecting request: {e}");
            AppError::Unauthorized
        })?;

        let subject = state.verifier.verify(token).await.map_err(|e| {
            warn!("Token verification failed: {e}");
            AppError::Unauthorized
        })?;

        Ok(AuthUser { subject })
    }
}

/// Pulls `<token>` out of `Authorization: Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let header = header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}
