//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Environment variable names understood by the SDK and CLI.
pub mod vars {
    /// Base URL of an on-premises Secret Server or Platform vault.
    pub const TSS_SERVER_URL: &str = "TSS_SERVER_URL";

    /// Secret Server Cloud tenant name.
    pub const TSS_TENANT: &str = "TSS_TENANT";

    /// Top-level domain for Secret Server Cloud.
    pub const TSS_TLD: &str = "TSS_TLD";

    /// Username for the OAuth password grant.
    pub const TSS_USERNAME: &str = "TSS_USERNAME";

    /// Password for the OAuth password grant.
    pub const TSS_PASSWORD: &str = "TSS_PASSWORD";

    /// Optional Active Directory domain.
    pub const TSS_DOMAIN: &str = "TSS_DOMAIN";

    /// Pre-issued access token; bypasses the password grant.
    pub const TSS_TOKEN: &str = "TSS_TOKEN";

    /// Config file override.
    pub const TSS_CONFIG: &str = "TSS_CONFIG";
}
