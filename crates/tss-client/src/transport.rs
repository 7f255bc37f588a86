//! The transport seam between secret logic and the wire.

use crate::body::RequestBody;
use crate::error::Result;
use crate::resource::Resource;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

/// Authenticated access to the REST API.
///
/// Implementations carry their own authentication; callers never see tokens.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method` against `{resource}/{path}`, optionally with a JSON body,
    /// returning the raw response body of a 2xx response.
    async fn request(
        &self,
        method: Method,
        resource: Resource,
        path: &str,
        body: Option<&RequestBody<'_>>,
    ) -> Result<Bytes>;

    /// Upload `content` as the attachment of the `slug` field on a secret.
    async fn upload_file(
        &self,
        secret_id: i64,
        slug: &str,
        filename: &str,
        content: &[u8],
    ) -> Result<()>;

    /// Run the paged search endpoint of `resource`, returning the raw body.
    ///
    /// With a `field`, the search is an exact match on that field; otherwise
    /// it also covers the machine, notes and username extended fields.
    async fn search(
        &self,
        resource: Resource,
        search_text: &str,
        field: Option<&str>,
    ) -> Result<Bytes>;
}
