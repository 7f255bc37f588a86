//! HTTP transport over `reqwest`.

use crate::auth::{self, TokenCache, TokenProvider};
use crate::body::RequestBody;
use crate::error::{ClientError, Result};
use crate::resource::Resource;
use crate::transport::Transport;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;
use tracing::debug;
use tss_core::Config;
use url::Url;

/// Number of records requested from the search endpoint.
const SEARCH_PAGE_SIZE: &str = "30";

/// Extended fields searched when no specific field is given.
const SEARCH_EXTENDED_FIELDS: [&str; 3] = ["Machine", "Notes", "Username"];

/// [`Transport`] that talks to a Secret Server over HTTPS.
pub struct HttpTransport {
    /// HTTP client.
    client: Client,

    /// Server location and credentials.
    config: Config,

    /// Bearer token source.
    tokens: Box<dyn TokenProvider>,
}

impl HttpTransport {
    /// Create a transport, validating the configuration.
    ///
    /// Tokens obtained through the password grant are stored in `cache`.
    pub fn new(config: Config, cache: TokenCache) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::config(format!("Failed to create HTTP client: {}", e)))?;

        let tokens = auth::provider_for(&config, cache);

        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    /// Like [`Transport::request`], but with the resource given by name.
    ///
    /// Names outside the allow-list fail before any network I/O.
    pub async fn access(
        &self,
        method: Method,
        resource: &str,
        path: &str,
        body: Option<&RequestBody<'_>>,
    ) -> Result<Bytes> {
        let resource: Resource = resource.parse()?;
        self.request(method, resource, path, body).await
    }

    fn search_url(&self, resource: Resource, search_text: &str, field: Option<&str>) -> Result<Url> {
        let base = self.config.url_for(resource.as_str(), "");
        let mut url = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| ClientError::config(format!("invalid URL '{}': {}", base, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("paging.filter.searchText", search_text)
                .append_pair("paging.filter.searchField", field.unwrap_or_default())
                .append_pair("paging.filter.doNotCalculateTotal", "true")
                .append_pair("paging.take", SEARCH_PAGE_SIZE)
                .append_pair("paging.skip", "0");

            match field {
                Some(_) => {
                    query.append_pair("paging.filter.isExactMatch", "true");
                }
                None => {
                    for extended in SEARCH_EXTENDED_FIELDS {
                        query.append_pair("paging.filter.extendedFields", extended);
                    }
                }
            }
        }

        Ok(url)
    }

    /// Attach the bearer token, send, and map non-2xx statuses to errors.
    async fn send(&self, builder: RequestBuilder) -> Result<Bytes> {
        let token = self.tokens.access_token(&self.client).await?;

        let response = builder.bearer_auth(token.expose_secret()).send().await?;

        let status = response.status();
        let data = response.bytes().await?;
        if status.is_success() {
            return Ok(data);
        }

        let err = ClientError::http(status.as_u16(), &data);
        if err.is_auth_failure() {
            self.tokens.invalidate();
        }
        Err(err)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        resource: Resource,
        path: &str,
        body: Option<&RequestBody<'_>>,
    ) -> Result<Bytes> {
        let payload = body.map(serde_json::to_vec).transpose()?;

        let url = self.config.url_for(resource.as_str(), path);
        let mut builder = self.client.request(method.clone(), &url);

        if method == Method::POST || method == Method::PUT || method == Method::PATCH {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if let Some(payload) = payload {
            builder = builder.body(payload);
        }

        debug!("calling {} {}", method, url);
        self.send(builder).await
    }

    async fn upload_file(
        &self,
        secret_id: i64,
        slug: &str,
        filename: &str,
        content: &[u8],
    ) -> Result<()> {
        let path = format!("{}/fields/{}", secret_id, slug);
        let url = self.config.url_for(Resource::Secrets.as_str(), &path);

        let part = Part::bytes(content.to_vec()).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        debug!("uploading file '{}' with PUT {}", filename, url);
        self.send(self.client.put(&url).multipart(form)).await?;
        Ok(())
    }

    async fn search(
        &self,
        resource: Resource,
        search_text: &str,
        field: Option<&str>,
    ) -> Result<Bytes> {
        if !resource.is_searchable() {
            return Err(ClientError::UnknownResource(resource.to_string()));
        }

        let url = self.search_url(resource, search_text, field)?;
        debug!("calling GET {}", url);
        self.send(self.client.get(url)).await
    }
}
