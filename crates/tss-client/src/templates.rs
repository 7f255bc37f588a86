//! Secret template reads and password generation.

use crate::error::{ClientError, Result};
use crate::resource::Resource;
use crate::server::{decode, Server};
use crate::transport::Transport;
use reqwest::Method;
use tracing::error;
use tss_core::SecretTemplate;

impl<T: Transport> Server<T> {
    /// Get the secret template with the given ID.
    pub async fn secret_template(&self, id: i64) -> Result<SecretTemplate> {
        let data = self
            .transport()
            .request(Method::GET, Resource::SecretTemplates, &id.to_string(), None)
            .await?;
        decode(&data, &format!("/{}/{}", Resource::SecretTemplates, id))
    }

    /// Generate a password for the field `slug` of `template`, following the
    /// password requirements the server has for that field.
    pub async fn generate_password(&self, slug: &str, template: &SecretTemplate) -> Result<String> {
        let field_id = template.field_slug_to_id(slug).ok_or_else(|| {
            error!(
                "the alias '{}' does not identify a field on the template named '{}'",
                slug, template.name
            );
            ClientError::FieldNotFound(format!(
                "'{}' on the template named '{}'",
                slug, template.name
            ))
        })?;

        let path = format!("generate-password/{}", field_id);
        let data = self
            .transport()
            .request(Method::POST, Resource::SecretTemplates, &path, None)
            .await?;

        // The password comes back as a JSON string literal.
        decode(&data, &format!("/{}/{}", Resource::SecretTemplates, path))
    }
}
