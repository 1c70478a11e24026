use std::sync::Arc;

use redis::Client as RedisClient;

use crate::auth::TokenVerifier;
use crate::jobs::store::JobStore;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; every backend sits behind a trait object so tests can
/// swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub llm: Arc<dyn CompletionClient>,
    /// Cache handle. Constructed when REDIS_URL is set; no handler uses it.
    #[allow(dead_code)]
    pub redis: Option<RedisClient>,
}
