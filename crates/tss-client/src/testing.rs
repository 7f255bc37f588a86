//! In-memory transport that records every call, for unit tests.

use crate::body::RequestBody;
use crate::error::{ClientError, Result};
use crate::resource::Resource;
use crate::transport::Transport;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Request {
        method: Method,
        resource: Resource,
        path: String,
        body: Option<serde_json::Value>,
    },
    Upload {
        secret_id: i64,
        slug: String,
        filename: String,
        content: Vec<u8>,
    },
    Search {
        search_text: String,
        field: Option<String>,
    },
}

impl Call {
    pub(crate) fn is_write(&self) -> bool {
        match self {
            Call::Request { method, .. } => *method != Method::GET,
            Call::Upload { .. } => true,
            Call::Search { .. } => false,
        }
    }
}

#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<String, std::result::Result<Bytes, u16>>>,
    calls: Mutex<Vec<Call>>,
}

fn key(method: &Method, resource: Resource, path: &str) -> String {
    format!("{} {}/{}", method, resource, path.trim_matches('/'))
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Respond to `method resource/path` with `body`.
    pub(crate) fn on(&self, method: Method, resource: Resource, path: &str, body: impl Into<Bytes>) {
        self.routes
            .lock()
            .unwrap()
            .insert(key(&method, resource, path), Ok(body.into()));
    }

    /// Respond to `method resource/path` with an error status.
    pub(crate) fn fail(&self, method: Method, resource: Resource, path: &str, status: u16) {
        self.routes
            .lock()
            .unwrap()
            .insert(key(&method, resource, path), Err(status));
    }

    /// Respond to searches on `resource` with `body`.
    pub(crate) fn on_search(&self, resource: Resource, body: impl Into<Bytes>) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("SEARCH {}", resource), Ok(body.into()));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn uploads(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Upload { .. }))
            .collect()
    }

    fn respond(&self, route: String) -> Result<Bytes> {
        match self.routes.lock().unwrap().get(&route) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(ClientError::http(*status, b"mock failure")),
            None => Err(ClientError::http(404, route.as_bytes())),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        resource: Resource,
        path: &str,
        body: Option<&RequestBody<'_>>,
    ) -> Result<Bytes> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.calls.lock().unwrap().push(Call::Request {
            method: method.clone(),
            resource,
            path: path.to_string(),
            body,
        });
        self.respond(key(&method, resource, path))
    }

    async fn upload_file(
        &self,
        secret_id: i64,
        slug: &str,
        filename: &str,
        content: &[u8],
    ) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Upload {
            secret_id,
            slug: slug.to_string(),
            filename: filename.to_string(),
            content: content.to_vec(),
        });
        let path = format!("{}/fields/{}", secret_id, slug);
        self.respond(key(&Method::PUT, Resource::Secrets, &path))
            .map(|_| ())
    }

    async fn search(
        &self,
        resource: Resource,
        search_text: &str,
        field: Option<&str>,
    ) -> Result<Bytes> {
        self.calls.lock().unwrap().push(Call::Search {
            search_text: search_text.to_string(),
            field: field.map(str::to_string),
        });
        self.respond(format!("SEARCH {}", resource))
    }
}
