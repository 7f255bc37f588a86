//! Configuration schema definitions.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};

/// Base URL template for Secret Server Cloud: `https://{tenant}.secretservercloud.{tld}/`.
pub const CLOUD_BASE_URL_PREFIX: &str = "secretservercloud";

/// Default top-level domain for Secret Server Cloud.
pub const DEFAULT_TLD: &str = "com";

/// Default REST API path below the base URL.
pub const DEFAULT_API_PATH_URI: &str = "/api/v1";

/// Default OAuth2 token endpoint below the base URL.
pub const DEFAULT_TOKEN_PATH_URI: &str = "/oauth2/token";

/// SDK configuration.
///
/// Exactly one of `server_url` (on-premises or Platform) and `tenant`
/// (Secret Server Cloud) must be set; see [`Config::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Credentials used to obtain an access token.
    #[serde(default)]
    pub credentials: Credentials,

    /// Base URL of a Secret Server instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Secret Server Cloud tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,

    /// Secret Server Cloud top-level domain.
    #[serde(default = "default_tld")]
    pub tld: String,

    /// REST API path.
    #[serde(default = "default_api_path_uri")]
    pub api_path_uri: String,

    /// OAuth2 token path.
    #[serde(default = "default_token_path_uri")]
    pub token_path_uri: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            server_url: None,
            tenant: None,
            tld: default_tld(),
            api_path_uri: default_api_path_uri(),
            token_path_uri: default_token_path_uri(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Username/password or pre-issued token.
///
/// When `token` is non-empty it is used as-is and the password grant is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Active Directory domain, if the account is a domain account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: SecretString,

    #[serde(default)]
    pub token: SecretString,
}

fn default_tld() -> String {
    DEFAULT_TLD.to_string()
}

fn default_api_path_uri() -> String {
    DEFAULT_API_PATH_URI.to_string()
}

fn default_token_path_uri() -> String {
    DEFAULT_TOKEN_PATH_URI.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}
