//! In-process fakes for router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::{AuthError, TokenVerifier};
use crate::jobs::store::JobStore;
use crate::llm_client::{CompletionClient, LlmError};
use crate::models::job::{Job, JobFields};
use crate::routes::build_router;
use crate::state::AppState;

/// Accepts `token-<x>` as subject `user-<x>`; everything else is refused.
pub struct StaticVerifier;

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        match token {
            "token-a" | "token-b" | "token-c" => Ok(token.replacen("token-", "user-", 1)),
            _ => Err(AuthError::InvalidSubject),
        }
    }
}

#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<Vec<Job>>,
    fail: bool,
}

impl MemoryJobStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.fail {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

fn parse_id(id: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(id).map_err(|e| sqlx::Error::Protocol(format!("invalid job id: {e}")))
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, owner: &str, fields: JobFields) -> Result<Job, sqlx::Error> {
        self.check()?;
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            user_id: owner.to_string(),
            company: fields.company,
            position: fields.position,
            status: fields.status,
            applied_date: fields.applied_date,
            follow_up_date: fields.follow_up_date,
            created_at: now,
            updated_at: now,
        };
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }

    async fn list(&self, owner: &str) -> Result<Vec<Job>, sqlx::Error> {
        self.check()?;
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|job| job.user_id == owner)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        owner: &str,
        id: &str,
        fields: JobFields,
    ) -> Result<Option<Job>, sqlx::Error> {
        self.check()?;
        let id = parse_id(id)?;
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.iter_mut().find(|j| j.id == id && j.user_id == owner) else {
            return Ok(None);
        };

        if let Some(company) = fields.company {
            job.company = Some(company);
        }
        if let Some(position) = fields.position {
            job.position = Some(position);
        }
        if let Some(status) = fields.status {
            job.status = Some(status);
        }
        if let Some(applied) = fields.applied_date {
            job.applied_date = Some(applied);
        }
        if let Some(follow_up) = fields.follow_up_date {
            job.follow_up_date = Some(follow_up);
        }
        job.updated_at = Utc::now();

        Ok(Some(job.clone()))
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<(), sqlx::Error> {
        self.check()?;
        let id = parse_id(id)?;
        self.jobs
            .lock()
            .unwrap()
            .retain(|j| !(j.id == id && j.user_id == owner));
        Ok(())
    }
}

/// Returns a canned upstream result and records every prompt it was sent.
pub struct FakeCompletionClient {
    response: Result<Value, u16>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeCompletionClient {
    pub fn new(response: Result<Value, u16>) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Value, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        match &self.response {
            Ok(payload) => Ok(payload.clone()),
            Err(status) => Err(LlmError::Api {
                status: *status,
                message: "upstream unavailable".to_string(),
            }),
        }
    }
}

pub struct TestApp {
    pub jobs: Arc<MemoryJobStore>,
    pub llm: Arc<FakeCompletionClient>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(MemoryJobStore::default(), Ok(Value::Null))
    }

    pub fn with_failing_store() -> Self {
        Self::build(MemoryJobStore::failing(), Ok(Value::Null))
    }

    pub fn with_upstream(response: Result<Value, u16>) -> Self {
        Self::build(MemoryJobStore::default(), response)
    }

    fn build(store: MemoryJobStore, response: Result<Value, u16>) -> Self {
        Self {
            jobs: Arc::new(store),
            llm: Arc::new(FakeCompletionClient::new(response)),
        }
    }

    pub fn router(&self) -> Router {
        build_router(AppState {
            jobs: self.jobs.clone(),
            verifier: Arc::new(StaticVerifier),
            llm: self.llm.clone(),
            redis: None,
        })
    }
}

/// Sends one request through the router and returns status plus JSON body
/// (`Null` for an empty body).
pub async fn send(
    router: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    match body {
        Some(json) => {
            send_raw(
                router,
                method,
                uri,
                token,
                Some("application/json"),
                json.to_string(),
            )
            .await
        }
        None => send_raw(router, method, uri, token, None, String::new()).await,
    }
}

/// Like `send`, but with a verbatim body and an explicit content type.
pub async fn send_raw(
    router: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
