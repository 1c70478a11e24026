//! Verifier for identity-provider ID tokens (Firebase Authentication).
//!
//! Tokens are RS256 JWTs signed by one of the provider's rotating keys,
//! published as a JWKS document. Keys are held in-process and refetched when
//! a token names a `kid` we have not seen, at most once per
//! `MIN_REFRESH_INTERVAL`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};

use super::{AuthError, TokenVerifier};

/// Public signing keys for ID tokens.
pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const MAX_SUBJECT_LEN: usize = 128;

/// Minimum gap between two key-set fetches triggered by unknown `kid`s.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
}

#[derive(Clone)]
pub struct FirebaseVerifier {
    project_id: String,
    issuer: String,
    jwks_url: String,
    http: reqwest::Client,
    keys: Arc<RwLock<HashMap<String, Jwk>>>,
    /// Time of the last fetch attempt. Held across the fetch so concurrent
    /// misses wait for one request instead of each issuing their own.
    last_refresh: Arc<Mutex<Option<Instant>>>,
    min_refresh_interval: Duration,
}

impl FirebaseVerifier {
    pub fn new(project_id: impl Into<String>, jwks_url: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            issuer: format!("{ISSUER_PREFIX}{project_id}"),
            project_id,
            jwks_url: jwks_url.into(),
            http: reqwest::Client::new(),
            keys: Arc::new(RwLock::new(HashMap::new())),
            last_refresh: Arc::new(Mutex::new(None)),
            min_refresh_interval: MIN_REFRESH_INTERVAL,
        }
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    async fn cached_key(&self, kid: &str) -> Option<Jwk> {
        self.keys.read().await.get(kid).cloned()
    }

    /// Looks up a signing key by `kid`, refetching the key set on a miss
    /// unless a fetch happened within the refresh interval.
    async fn signing_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(jwk) = self.cached_key(kid).await {
            return Ok(jwk);
        }

        let mut last_refresh = self.last_refresh.lock().await;

        // another request may have refreshed while we waited for the lock
        if let Some(jwk) = self.cached_key(kid).await {
            return Ok(jwk);
        }

        if let Some(at) = *last_refresh {
            if at.elapsed() < self.min_refresh_interval {
                debug!("Unknown kid {kid}; key set refreshed recently, not refetching");
                return Err(AuthError::KeyNotFound(kid.to_string()));
            }
        }

        *last_refresh = Some(Instant::now());
        self.refresh_keys().await?;
        drop(last_refresh);

        self.cached_key(kid)
            .await
            .ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        debug!("Fetching signing keys from {}", self.jwks_url);

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetch(format!(
                "{} returned status {}",
                self.jwks_url,
                response.status()
            )));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        let fresh: HashMap<String, Jwk> = jwks
            .keys
            .into_iter()
            .filter_map(|jwk| jwk.common.key_id.clone().map(|kid| (kid, jwk)))
            .collect();

        let mut keys = self.keys.write().await;
        *keys = fresh;
        info!("Loaded {} identity-provider signing keys", keys.len());

        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }
        let kid = header.kid.ok_or(AuthError::MissingKid)?;

        let jwk = self.signing_key(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let claims = decode::<IdTokenClaims>(token, &key, &validation)?.claims;

        if claims.sub.is_empty() || claims.sub.len() > MAX_SUBJECT_LEN {
            return Err(AuthError::InvalidSubject);
        }

        Ok(claims.sub)
    }
}
