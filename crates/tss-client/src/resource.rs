//! The fixed set of API resources the client may address.

use crate::error::ClientError;
use std::fmt;
use std::str::FromStr;

/// An API resource kind; the URL path component below the API root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `secrets`
    Secrets,
    /// `secret-templates`
    SecretTemplates,
}

impl Resource {
    /// URL path component.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secrets => "secrets",
            Self::SecretTemplates => "secret-templates",
        }
    }

    /// Whether the resource supports the paged search endpoint.
    pub fn is_searchable(&self) -> bool {
        matches!(self, Self::Secrets)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_matches('/') {
            "secrets" => Ok(Self::Secrets),
            "secret-templates" => Ok(Self::SecretTemplates),
            other => {
                tracing::error!("unknown resource: {}", other);
                Err(ClientError::UnknownResource(other.to_string()))
            }
        }
    }
}
