//! # tss-core
//!
//! Core model and configuration for the Secret Server SDK.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Types**: secrets, secret fields, templates and the SSH generation directive
//! - **Classification**: resolving a secret's fields against its template and
//!   splitting file fields from scalar fields
//! - **Configuration**: loading, validation, and URL construction

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod secret;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, SchemaError};
pub use secret::SecretString;
pub use types::*;
