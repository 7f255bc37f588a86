//! Secret reads and writes against a Secret Server.

use crate::auth::TokenCache;
use crate::body::RequestBody;
use crate::error::{ClientError, Result};
use crate::files;
use crate::http::HttpTransport;
use crate::resource::Resource;
use crate::transport::Transport;
use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};
use tss_core::{Config, Secret};

/// A Secret Server client.
///
/// All secret logic lives here; the wire is behind `T`.
pub struct Server<T = HttpTransport> {
    transport: T,
}

/// One page of search results. Only the IDs are used.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchPage {
    #[serde(alias = "Records")]
    records: Vec<SearchRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchRecord {
    #[serde(alias = "ID", alias = "Id")]
    id: i64,
}

/// Parse a response body, keeping the raw bytes on failure.
pub(crate) fn decode<D: DeserializeOwned>(data: &Bytes, context: &str) -> Result<D> {
    serde_json::from_slice(data).map_err(|source| {
        error!("error parsing response from {}: {}", context, source);
        ClientError::Decode {
            context: context.to_string(),
            body: data.clone(),
            source,
        }
    })
}

impl Server<HttpTransport> {
    /// Create a client over HTTPS with a private token cache.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_cache(config, TokenCache::new())
    }

    /// Create a client over HTTPS that keeps its tokens in `cache`.
    pub fn with_cache(config: Config, cache: TokenCache) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config, cache)?))
    }
}

impl<T: Transport> Server<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the secret with the given ID.
    ///
    /// File fields that have an attachment are fetched separately and their
    /// content replaces the placeholder value. Any failed fetch fails the read.
    pub async fn secret(&self, id: i64) -> Result<Secret> {
        let path = id.to_string();
        let data = self
            .transport
            .request(Method::GET, Resource::Secrets, &path, None)
            .await?;
        let mut secret: Secret = decode(&data, &format!("/{}/{}", Resource::Secrets, id))?;

        for field in secret
            .fields
            .iter_mut()
            .filter(|f| f.is_file && f.file_attachment_id != 0 && !f.filename.is_empty())
        {
            let path = format!("{}/fields/{}", id, field.slug);
            let data = self
                .transport
                .request(Method::GET, Resource::Secrets, &path, None)
                .await?;
            debug!("inlined {} bytes of the '{}' attachment", data.len(), field.slug);
            field.item_value = String::from_utf8_lossy(&data).into_owned();
        }

        Ok(secret)
    }

    /// Search secrets and return each match, fully read.
    ///
    /// With a `field`, `search_text` must match that field exactly.
    pub async fn secrets(&self, search_text: &str, field: Option<&str>) -> Result<Vec<Secret>> {
        let data = self
            .transport
            .search(Resource::Secrets, search_text, field)
            .await?;
        let page: SearchPage = decode(&data, "/secrets search")?;

        debug!("search for '{}' matched {} secrets", search_text, page.records.len());
        let mut secrets = Vec::with_capacity(page.records.len());
        for record in page.records {
            secrets.push(self.secret(record.id).await?);
        }
        Ok(secrets)
    }

    /// Create a new secret and return it as the server now has it.
    pub async fn create_secret(&self, secret: Secret) -> Result<Secret> {
        self.write_secret(secret, Method::POST, String::new()).await
    }

    /// Update an existing secret and return it as the server now has it.
    ///
    /// SSH generation is creation-only and is rejected before any request.
    pub async fn update_secret(&self, mut secret: Secret) -> Result<Secret> {
        if secret.ssh_generation_requested() {
            return Err(ClientError::SshGenerationOnUpdate { name: secret.name });
        }
        if secret.id <= 0 {
            return Err(ClientError::config(format!(
                "cannot update the secret named '{}' without an ID",
                secret.name
            )));
        }

        secret.ssh_key_args = None;
        let path = secret.id.to_string();
        self.write_secret(secret, Method::PUT, path).await
    }

    /// Delete the secret with the given ID.
    pub async fn delete_secret(&self, id: i64) -> Result<()> {
        self.transport
            .request(Method::DELETE, Resource::Secrets, &id.to_string(), None)
            .await?;
        info!("deleted secret {}", id);
        Ok(())
    }

    async fn write_secret(&self, mut secret: Secret, method: Method, path: String) -> Result<Secret> {
        let template = self.secret_template(secret.secret_template_id).await?;

        // With SSH generation the server owns the key fields, so they go as-is.
        let mut file_fields = Vec::new();
        if !secret.ssh_generation_requested() {
            let (files, general) = secret.separate_file_fields(&template)?;
            debug!(
                "secret '{}' has {} file fields and {} general fields",
                secret.name,
                files.len(),
                general.len()
            );
            file_fields = files;
            secret.fields = general;
        }

        if secret.ssh_key_args.is_some_and(|args| !args.is_requested()) {
            secret.ssh_key_args = None;
        }

        let body = RequestBody::Secret(&secret);
        let data = self
            .transport
            .request(method, Resource::Secrets, &path, Some(&body))
            .await?;
        let written: Secret = decode(&data, &format!("/{}", Resource::Secrets))?;

        files::reconcile_file_fields(&self.transport, written.id, &file_fields).await?;

        info!("wrote secret {} ('{}')", written.id, written.name);
        self.secret(written.id).await
    }
}
