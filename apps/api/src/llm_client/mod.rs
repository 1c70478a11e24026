//! LLM Client — the single point of entry for completion-service calls.
//!
//! No other module may call the upstream API directly; handlers go through
//! the `CompletionClient` trait so tests can substitute a fake.
//!
//! The response body is relayed verbatim. No retries and no timeout beyond
//! the reqwest defaults.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// Default upstream endpoint; overridable via `OPENAI_API_URL`.
pub const OPENAI_COMPLETIONS_URL: &str = "https://api.openai.com/v1/completions";
/// The model used for all completion calls.
pub const MODEL: &str = "gpt-4";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

/// Sends one prompt upstream and returns the raw JSON response.
///
/// Carried in `AppState` as `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Value, LlmError>;
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Value, LlmError> {
        let request_body = CompletionRequest {
            model: MODEL,
            prompt,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: Value = response.json().await?;
        debug!("Completion call succeeded (max_tokens={max_tokens})");

        Ok(payload)
    }
}
