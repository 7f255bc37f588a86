//! JSON request bodies.

use serde::Serialize;
use tss_core::Secret;

/// A request body, one variant per endpoint shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RequestBody<'a> {
    /// Full secret for `POST secrets` / `PUT secrets/{id}`.
    Secret(&'a Secret),

    /// Partial update for `PATCH secrets/{id}/general`.
    FieldPatch(SecretPatch),
}

/// `{"Data": {"SecretFields": [...]}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretPatch {
    #[serde(rename = "Data")]
    pub data: FieldMods,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMods {
    #[serde(rename = "SecretFields")]
    pub secret_fields: Vec<FieldMod>,
}

/// A single field change. Only fields marked dirty are applied by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMod {
    #[serde(rename = "Slug")]
    pub slug: String,

    #[serde(rename = "Dirty")]
    pub dirty: bool,

    #[serde(rename = "Value")]
    pub value: Option<String>,
}

impl SecretPatch {
    /// Patch that removes a file field's attachment, keeping the field itself.
    pub fn clear_field(slug: impl Into<String>) -> Self {
        Self {
            data: FieldMods {
                secret_fields: vec![FieldMod {
                    slug: slug.into(),
                    dirty: true,
                    value: None,
                }],
            },
        }
    }
}
