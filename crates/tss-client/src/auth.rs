//! Access token acquisition and caching.
//!
//! [`TokenCache`] is an explicit, cloneable cache keyed by base URL. Pass the
//! same cache to several transports to share tokens between them; clones share
//! state. Concurrent refreshes of one slot are harmless: the last write wins.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};
use tss_core::{Config, SecretString};

/// Longest token lifetime honored, in seconds (one year).
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Source of bearer tokens for API requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token valid for at least the next request.
    async fn access_token(&self, client: &Client) -> Result<SecretString>;

    /// Forget any cached token, e.g. after the server rejected it.
    fn invalidate(&self) {}
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

/// Tokens keyed by server base URL, each with an expiry.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    slots: Arc<DashMap<String, CachedToken>>,
}

impl TokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token for `base_url`, unless it has expired.
    pub fn get(&self, base_url: &str) -> Option<SecretString> {
        let slot = self.slots.get(base_url)?;
        if Utc::now() < slot.expires_at {
            Some(slot.token.clone())
        } else {
            None
        }
    }

    /// Cache a token the server said lives for `expires_in` seconds.
    ///
    /// The entry is considered stale after a tenth of that lifetime, so a
    /// token is never presented close to its real expiry.
    ///
    /// Lifetimes are capped at [`MAX_TOKEN_LIFETIME_SECS`].
    pub fn set(&self, base_url: &str, token: SecretString, expires_in: i64) {
        let expires_in = expires_in.clamp(0, MAX_TOKEN_LIFETIME_SECS);
        let margin = (expires_in as f64 * 0.9).floor() as i64;
        let now = Utc::now();
        let expires_at = Duration::try_seconds(expires_in - margin)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(now);
        self.slots
            .insert(base_url.to_string(), CachedToken { token, expires_at });
    }

    /// Drop the token cached for `base_url`.
    pub fn invalidate(&self, base_url: &str) {
        if self.slots.remove(base_url).is_some() {
            debug!("invalidated cached access token for {}", base_url);
        }
    }
}

/// A pre-issued token, used as-is.
#[derive(Debug, Clone)]
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self, _client: &Client) -> Result<SecretString> {
        Ok(self.0.clone())
    }
}

/// OAuth2 resource-owner password grant against the server's token endpoint.
#[derive(Debug, Clone)]
pub struct PasswordGrant {
    base_url: String,
    token_url: String,
    username: String,
    password: SecretString,
    domain: Option<String>,
    cache: TokenCache,
}

#[derive(Deserialize)]
struct GrantResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

impl PasswordGrant {
    /// Build a grant from the configured credentials.
    pub fn new(config: &Config, cache: TokenCache) -> Self {
        Self {
            base_url: config.base_url(),
            token_url: config.token_url(),
            username: config.credentials.username.clone(),
            password: config.credentials.password.clone(),
            domain: config.credentials.domain.clone(),
            cache,
        }
    }
}

#[async_trait]
impl TokenProvider for PasswordGrant {
    async fn access_token(&self, client: &Client) -> Result<SecretString> {
        if let Some(token) = self.cache.get(&self.base_url) {
            return Ok(token);
        }

        let mut form = vec![
            ("username", self.username.as_str()),
            ("password", self.password.expose_secret()),
            ("grant_type", "password"),
        ];
        if let Some(domain) = self.domain.as_deref() {
            form.push(("domain", domain));
        }

        debug!("requesting access token from {}", self.token_url);
        let response = client.post(&self.token_url).form(&form).send().await?;

        let status = response.status();
        let data = response.bytes().await?;
        if !status.is_success() {
            let err = ClientError::http(status.as_u16(), &data);
            error!("grant response error: {}", err);
            return Err(err);
        }

        let grant: GrantResponse =
            serde_json::from_slice(&data).map_err(|source| {
                error!("parsing grant response: {}", source);
                ClientError::Decode {
                    context: self.token_url.clone(),
                    body: data.clone(),
                    source,
                }
            })?;

        if grant.access_token.is_empty() {
            return Err(ClientError::auth("token endpoint returned an empty access token"));
        }

        let token = SecretString::new(grant.access_token);
        self.cache.set(&self.base_url, token.clone(), grant.expires_in);
        Ok(token)
    }

    fn invalidate(&self) {
        self.cache.invalidate(&self.base_url);
    }
}

/// Choose a token provider for the configuration: a configured token wins
/// over the password grant.
pub fn provider_for(config: &Config, cache: TokenCache) -> Box<dyn TokenProvider> {
    if config.credentials.token.is_empty() {
        Box::new(PasswordGrant::new(config, cache))
    } else {
        Box::new(StaticToken::new(config.credentials.token.clone()))
    }
}
