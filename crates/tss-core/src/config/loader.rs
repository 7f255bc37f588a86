//! Configuration loading, persistence, and URL construction.

use super::{Config, CLOUD_BASE_URL_PREFIX};
use crate::env::{self, vars};
use crate::error::ConfigError;
use crate::paths;
use crate::secret::SecretString;
use std::fs;
use std::path::Path;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = match env::get_var(vars::TSS_CONFIG) {
            Some(path) => path.into(),
            None => paths::config_file()?,
        };
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Create a config from `TSS_*` environment variables alone.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load the config file if there is one, then let the environment override it.
    pub fn load_or_env() -> Result<Self, ConfigError> {
        let mut config = match Self::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::default(),
            Err(e) => return Err(e),
        };
        config.apply_env();
        Ok(config)
    }

    /// Override settings with any `TSS_*` environment variables that are set.
    pub fn apply_env(&mut self) {
        self.apply_vars(env::get_var);
    }

    /// Override settings from an arbitrary variable lookup.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(vars::TSS_SERVER_URL) {
            self.server_url = Some(url);
        }
        if let Some(tenant) = lookup(vars::TSS_TENANT) {
            self.tenant = Some(tenant);
        }
        if let Some(tld) = lookup(vars::TSS_TLD) {
            self.tld = tld;
        }
        if let Some(username) = lookup(vars::TSS_USERNAME) {
            self.credentials.username = username;
        }
        if let Some(password) = lookup(vars::TSS_PASSWORD) {
            self.credentials.password = SecretString::new(password);
        }
        if let Some(domain) = lookup(vars::TSS_DOMAIN) {
            self.credentials.domain = Some(domain);
        }
        if let Some(token) = lookup(vars::TSS_TOKEN) {
            self.credentials.token = SecretString::new(token);
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let has_url = self.server_url.as_deref().is_some_and(|s| !s.trim().is_empty());
        let has_tenant = self.tenant.as_deref().is_some_and(|s| !s.trim().is_empty());
        if has_url == has_tenant {
            errors.push(
                "either ServerURL of Secret Server/Platform or Tenant of Secret Server Cloud must be set"
                    .to_string(),
            );
        }

        if has_tenant && self.tld.trim().is_empty() {
            errors.push("tld must not be empty when a tenant is set".to_string());
        }

        if self.credentials.token.is_empty() && self.credentials.username.is_empty() {
            errors.push("either a token or a username must be provided".to_string());
        }

        if self.timeout_secs == 0 {
            errors.push("timeout_secs must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// The server's base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        match self.server_url.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.{}.{}",
                self.tenant.as_deref().unwrap_or_default(),
                CLOUD_BASE_URL_PREFIX,
                self.tld
            ),
        }
    }

    /// URL for `path` below an API resource, e.g. `secrets` + `12/fields/notes`.
    pub fn url_for(&self, resource: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url().trim_matches('/'),
            self.api_path_uri.trim_matches('/'),
            resource.trim_matches('/'),
            path.trim_matches('/')
        )
    }

    /// URL of the OAuth2 token endpoint.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url().trim_matches('/'),
            self.token_path_uri.trim_matches('/')
        )
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target an on-premises Secret Server.
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = Some(url.into());
        self
    }

    /// Target a Secret Server Cloud tenant.
    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.config.tenant = Some(tenant.into());
        self
    }

    /// Set the Secret Server Cloud top-level domain.
    pub fn tld(mut self, tld: impl Into<String>) -> Self {
        self.config.tld = tld.into();
        self
    }

    /// Set password-grant credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        self.config.credentials.username = username.into();
        self.config.credentials.password = password.into();
        self
    }

    /// Set the Active Directory domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config.credentials.domain = Some(domain.into());
        self
    }

    /// Use a pre-issued access token.
    pub fn token(mut self, token: impl Into<SecretString>) -> Self {
        self.config.credentials.token = token.into();
        self
    }

    /// Override the REST API path.
    pub fn api_path_uri(mut self, path: impl Into<String>) -> Self {
        self.config.api_path_uri = path.into();
        self
    }

    /// Override the token endpoint path.
    pub fn token_path_uri(mut self, path: impl Into<String>) -> Self {
        self.config.token_path_uri = path.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.config.timeout_secs = seconds;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
