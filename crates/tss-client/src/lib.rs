//! Async client for the Secret Server REST API.
//!
//! This crate provides:
//! - Secret reads, with file attachments inlined into their fields
//! - Secret creation and update, with file fields uploaded or cleared
//!   after the secret body is written
//! - Secret search and deletion
//! - Template reads and server-side password generation
//!
//! # Example
//!
//! ```rust,ignore
//! use tss_client::{Server, Secret, SecretField};
//! use tss_core::config::ConfigBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigBuilder::new()
//!         .tenant("mytenant")
//!         .credentials("svc-account", "hunter2")
//!         .build_validated()?;
//!     let server = Server::new(config)?;
//!
//!     let secret = server.secret(42).await?;
//!     println!("password: {:?}", secret.field("password"));
//!
//!     let created = server
//!         .create_secret(Secret {
//!             name: "db01".to_string(),
//!             folder_id: 3,
//!             secret_template_id: 6007,
//!             fields: vec![
//!                 SecretField::with_slug("machine", "db01"),
//!                 SecretField::with_slug("private-key", "-----BEGIN KEY-----").filename("id_rsa"),
//!             ],
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("created secret {}", created.id);
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod body;
mod error;
mod files;
mod http;
mod resource;
mod server;
mod templates;
mod transport;

#[cfg(test)]
mod testing;

pub use auth::{PasswordGrant, StaticToken, TokenCache, TokenProvider, MAX_TOKEN_LIFETIME_SECS};
pub use body::{FieldMod, FieldMods, RequestBody, SecretPatch};
pub use error::{ClientError, Result, ERROR_BODY_LENGTH};
pub use files::{normalize_filename, DEFAULT_EXTENSION, DEFAULT_FILENAME};
pub use http::HttpTransport;
pub use resource::Resource;
pub use server::Server;
pub use transport::Transport;

pub use reqwest::Method;
pub use tss_core::{Config, Secret, SecretField, SecretTemplate, SshKeyArgs, TemplateField};
