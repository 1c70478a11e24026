mod ai;
mod auth;
mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::firebase::FirebaseVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::store::PgJobStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobloom API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize identity verifier
    let verifier = FirebaseVerifier::new(
        config.firebase.project_id.clone(),
        config.firebase_jwks_url.clone(),
    );
    info!(
        "Identity verifier initialized (project: {})",
        config.firebase.project_id
    );

    // Initialize Redis (optional, unused by handlers)
    let redis = config.redis_url.as_deref().and_then(open_redis);

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
    );
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        jobs: Arc::new(PgJobStore::new(db)),
        verifier: Arc::new(verifier),
        llm: Arc::new(llm),
        redis,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Opens the optional cache handle. A bad URL is logged and startup continues
/// without a cache, since no handler depends on it.
fn open_redis(url: &str) -> Option<redis::Client> {
    match redis::Client::open(url) {
        Ok(client) => {
            info!("Redis client initialized");
            Some(client)
        }
        Err(e) => {
            error!("Redis client initialization failed, continuing without cache: {e}");
            None
        }
    }
}
