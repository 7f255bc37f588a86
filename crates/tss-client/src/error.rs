//! Error types for the Secret Server client.

use bytes::Bytes;
use thiserror::Error;
use tss_core::{ConfigError, SchemaError};

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Maximum number of response body bytes echoed in an HTTP error.
pub const ERROR_BODY_LENGTH: usize = 255;

/// Client error types.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid configuration or caller input; nothing was sent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource kind outside the allow-list; nothing was sent.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Token acquisition failed.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Non-2xx response. `body` is truncated to [`ERROR_BODY_LENGTH`] bytes.
    #[error("{status}: {body}")]
    Http { status: u16, body: String },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request body serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A response body could not be parsed; `body` holds the raw bytes.
    #[error("error parsing response from {context}: {source}")]
    Decode {
        context: String,
        body: Bytes,
        #[source]
        source: serde_json::Error,
    },

    /// Secret fields do not match the template.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// SSH generation was requested on an update.
    #[error(
        "SSH key and passphrase generation is only supported during secret creation. \
         Could not update the secret named '{name}'"
    )]
    SshGenerationOnUpdate { name: String },

    /// Uploading or clearing a file field failed.
    #[error("file field '{slug}': {source}")]
    FileField {
        slug: String,
        #[source]
        source: Box<ClientError>,
    },

    /// A slug or name did not identify a field.
    #[error("Field not found: {0}")]
    FieldNotFound(String),
}

impl ClientError {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create an HTTP status error, truncating the response body.
    pub fn http(status: u16, body: &[u8]) -> Self {
        let body = if body.len() >= ERROR_BODY_LENGTH {
            format!("{}...", String::from_utf8_lossy(&body[..ERROR_BODY_LENGTH]))
        } else {
            String::from_utf8_lossy(body).into_owned()
        };
        Self::Http { status, body }
    }

    /// Wrap an error with the file field it occurred on.
    pub fn file_field(slug: impl Into<String>, source: ClientError) -> Self {
        Self::FileField {
            slug: slug.into(),
            source: Box::new(source),
        }
    }

    /// HTTP status code, if this is an HTTP status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::FileField { source, .. } => source.status(),
            _ => None,
        }
    }

    /// True for 401/403 responses, which invalidate the cached token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
