//! Secrets, their fields, and field classification against a template.

use super::{is_zero, nullable, SecretTemplate};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A secret record.
///
/// `id` is zero until the secret has been created on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secret {
    #[serde(rename = "Name", alias = "name", deserialize_with = "nullable")]
    pub name: String,

    #[serde(rename = "FolderID", alias = "folderId", deserialize_with = "nullable")]
    pub folder_id: i64,

    #[serde(rename = "ID", alias = "id", deserialize_with = "nullable")]
    pub id: i64,

    #[serde(rename = "SiteID", alias = "siteId", deserialize_with = "nullable")]
    pub site_id: i64,

    #[serde(rename = "SecretTemplateID", alias = "secretTemplateId", deserialize_with = "nullable")]
    pub secret_template_id: i64,

    #[serde(
        rename = "SecretPolicyID",
        alias = "secretPolicyId",
        deserialize_with = "nullable",
        skip_serializing_if = "is_zero"
    )]
    pub secret_policy_id: i64,

    #[serde(
        rename = "PasswordTypeWebScriptID",
        alias = "passwordTypeWebScriptId",
        deserialize_with = "nullable",
        skip_serializing_if = "is_zero"
    )]
    pub password_type_web_script_id: i64,

    #[serde(
        rename = "LauncherConnectAsSecretID",
        alias = "launcherConnectAsSecretId",
        deserialize_with = "nullable"
    )]
    pub launcher_connect_as_secret_id: i64,

    #[serde(
        rename = "CheckOutIntervalMinutes",
        alias = "checkOutIntervalMinutes",
        deserialize_with = "nullable"
    )]
    pub check_out_interval_minutes: i64,

    #[serde(rename = "Active", alias = "active", deserialize_with = "nullable")]
    pub active: bool,

    #[serde(rename = "CheckedOut", alias = "checkedOut", deserialize_with = "nullable")]
    pub checked_out: bool,

    #[serde(rename = "CheckOutEnabled", alias = "checkOutEnabled", deserialize_with = "nullable")]
    pub check_out_enabled: bool,

    #[serde(rename = "AutoChangeEnabled", alias = "autoChangeEnabled", deserialize_with = "nullable")]
    pub auto_change_enabled: bool,

    #[serde(
        rename = "CheckOutChangePasswordEnabled",
        alias = "checkOutChangePasswordEnabled",
        deserialize_with = "nullable"
    )]
    pub check_out_change_password_enabled: bool,

    #[serde(rename = "DelayIndexing", alias = "delayIndexing", deserialize_with = "nullable")]
    pub delay_indexing: bool,

    #[serde(
        rename = "EnableInheritPermissions",
        alias = "enableInheritPermissions",
        deserialize_with = "nullable"
    )]
    pub enable_inherit_permissions: bool,

    #[serde(
        rename = "EnableInheritSecretPolicy",
        alias = "enableInheritSecretPolicy",
        deserialize_with = "nullable"
    )]
    pub enable_inherit_secret_policy: bool,

    #[serde(rename = "ProxyEnabled", alias = "proxyEnabled", deserialize_with = "nullable")]
    pub proxy_enabled: bool,

    #[serde(rename = "RequiresComment", alias = "requiresComment", deserialize_with = "nullable")]
    pub requires_comment: bool,

    #[serde(
        rename = "SessionRecordingEnabled",
        alias = "sessionRecordingEnabled",
        deserialize_with = "nullable"
    )]
    pub session_recording_enabled: bool,

    #[serde(
        rename = "WebLauncherRequiresIncognitoMode",
        alias = "webLauncherRequiresIncognitoMode",
        deserialize_with = "nullable"
    )]
    pub web_launcher_requires_incognito_mode: bool,

    /// Always serialized, as `[]` when there are no fields; the server rejects
    /// a write with the key missing.
    #[serde(rename = "Items", alias = "items", deserialize_with = "nullable")]
    pub fields: Vec<SecretField>,

    /// Request-only SSH key generation directive. Never read from a response.
    #[serde(rename = "SshKeyArgs", skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub ssh_key_args: Option<SshKeyArgs>,
}

/// A field (item) of a secret.
///
/// The `is_*` flags are reliable on secrets read from the server; on a
/// caller-built write request only the template is trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretField {
    #[serde(rename = "ItemID", alias = "itemId", deserialize_with = "nullable")]
    pub item_id: i64,

    #[serde(rename = "FieldID", alias = "fieldId", deserialize_with = "nullable")]
    pub field_id: i64,

    #[serde(rename = "FileAttachmentID", alias = "fileAttachmentId", deserialize_with = "nullable")]
    pub file_attachment_id: i64,

    #[serde(rename = "FieldName", alias = "fieldName", deserialize_with = "nullable")]
    pub field_name: String,

    #[serde(rename = "Slug", alias = "slug", deserialize_with = "nullable")]
    pub slug: String,

    #[serde(rename = "FieldDescription", alias = "fieldDescription", deserialize_with = "nullable")]
    pub field_description: String,

    #[serde(rename = "Filename", alias = "filename", deserialize_with = "nullable")]
    pub filename: String,

    #[serde(rename = "ItemValue", alias = "itemValue", deserialize_with = "nullable")]
    pub item_value: String,

    #[serde(rename = "IsFile", alias = "isFile", deserialize_with = "nullable")]
    pub is_file: bool,

    #[serde(rename = "IsNotes", alias = "isNotes", deserialize_with = "nullable")]
    pub is_notes: bool,

    #[serde(rename = "IsPassword", alias = "isPassword", deserialize_with = "nullable")]
    pub is_password: bool,
}

/// Whether to have the server generate an SSH key pair and/or a private key
/// passphrase, on templates that support it.
///
/// Only valid on create requests; never present in responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshKeyArgs {
    #[serde(rename = "GeneratePassphrase", alias = "generatePassphrase")]
    pub generate_passphrase: bool,

    #[serde(rename = "GenerateSshKeys", alias = "generateSshKeys")]
    pub generate_ssh_keys: bool,
}

impl SshKeyArgs {
    /// Request generation of both the key pair and its passphrase.
    pub fn generate_all() -> Self {
        Self {
            generate_passphrase: true,
            generate_ssh_keys: true,
        }
    }

    /// True if either kind of generation is asked for.
    pub fn is_requested(&self) -> bool {
        self.generate_ssh_keys || self.generate_passphrase
    }
}

impl SecretField {
    /// A field addressed by its template slug.
    pub fn with_slug(slug: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            item_value: value.into(),
            ..Default::default()
        }
    }

    /// A field addressed by its template field ID.
    pub fn with_field_id(field_id: i64, value: impl Into<String>) -> Self {
        Self {
            field_id,
            item_value: value.into(),
            ..Default::default()
        }
    }

    /// Set the attachment filename.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

impl Secret {
    /// Whether this request asks the server to generate SSH material.
    pub fn ssh_generation_requested(&self) -> bool {
        self.ssh_key_args.is_some_and(|args| args.is_requested())
    }

    /// Value of the first field whose display name or slug equals `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self
            .fields
            .iter()
            .find(|field| field.field_name == name || field.slug == name)
        {
            Some(field) => {
                debug!("field with name '{}' matches '{}'", field.field_name, name);
                Some(field.item_value.as_str())
            }
            None => {
                debug!("no matching field for name '{}' in secret '{}'", name, self.name);
                None
            }
        }
    }

    /// Value of the first field with the given template field ID.
    pub fn field_by_id(&self, field_id: i64) -> Option<&str> {
        match self.fields.iter().find(|field| field.field_id == field_id) {
            Some(field) => {
                debug!("field with name '{}' matches field ID '{}'", field.field_name, field_id);
                Some(field.item_value.as_str())
            }
            None => {
                debug!("no matching field for ID '{}' in secret '{}'", field_id, self.name);
                None
            }
        }
    }

    /// Split this secret's fields into `(file_fields, general_fields)` using
    /// the template's field definitions.
    ///
    /// A field with an empty slug is resolved through its field ID. Every
    /// field must resolve to a template definition; the first one that does
    /// not aborts classification. Input order is kept within each group, and
    /// file fields are returned with their slug filled in.
    pub fn separate_file_fields(
        &self,
        template: &SecretTemplate,
    ) -> Result<(Vec<SecretField>, Vec<SecretField>), SchemaError> {
        let mut file_fields = Vec::new();
        let mut general_fields = Vec::new();

        for field in &self.fields {
            let slug = if field.slug.is_empty() {
                template.field_id_to_slug(field.field_id).ok_or(
                    SchemaError::FieldIdNotDefined {
                        field_id: field.field_id,
                        template_id: template.id,
                    },
                )?
            } else {
                field.slug.as_str()
            };

            let definition =
                template
                    .get_field(slug)
                    .ok_or_else(|| SchemaError::FieldNameNotDefined {
                        slug: slug.to_string(),
                        template_id: template.id,
                    })?;

            if definition.is_file {
                // Attachments are addressed by slug, so resolve it here.
                let mut field = field.clone();
                field.slug = slug.to_string();
                file_fields.push(field);
            } else {
                general_fields.push(field.clone());
            }
        }

        Ok((file_fields, general_fields))
    }
}
