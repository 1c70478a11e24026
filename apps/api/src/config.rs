use anyhow::{Context, Result};
use serde::Deserialize;

use crate::auth::firebase::GOOGLE_JWKS_URL;
use crate::llm_client::OPENAI_COMPLETIONS_URL;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub firebase: ServiceAccount,
    pub firebase_jwks_url: String,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

/// The subset of the identity provider's service-account blob we rely on.
/// Other keys in the blob (private key, client email, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let firebase = parse_service_account(&require_env("FIREBASE_CREDENTIALS")?)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: optional_env("REDIS_URL"),
            firebase,
            firebase_jwks_url: optional_env("FIREBASE_JWKS_URL")
                .unwrap_or_else(|| GOOGLE_JWKS_URL.to_string()),
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_url: optional_env("OPENAI_API_URL")
                .unwrap_or_else(|| OPENAI_COMPLETIONS_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_service_account(raw: &str) -> Result<ServiceAccount> {
    let account: ServiceAccount =
        serde_json::from_str(raw).context("FIREBASE_CREDENTIALS must be a service-account JSON object")?;
    anyhow::ensure!(
        !account.project_id.trim().is_empty(),
        "FIREBASE_CREDENTIALS has an empty project_id"
    );
    Ok(account)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
