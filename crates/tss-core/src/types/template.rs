//! Secret templates and field-definition lookups.

use super::nullable;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The schema a class of secrets follows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretTemplate {
    #[serde(rename = "ID", alias = "id", deserialize_with = "nullable")]
    pub id: i64,

    #[serde(rename = "Name", alias = "name", deserialize_with = "nullable")]
    pub name: String,

    #[serde(rename = "Fields", alias = "fields", deserialize_with = "nullable")]
    pub fields: Vec<TemplateField>,
}

/// One field definition on a template.
///
/// `secret_template_field_id` and `field_slug_name` are each unique within a
/// template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateField {
    #[serde(
        rename = "SecretTemplateFieldID",
        alias = "secretTemplateFieldId",
        deserialize_with = "nullable"
    )]
    pub secret_template_field_id: i64,

    #[serde(rename = "FieldSlugName", alias = "fieldSlugName", deserialize_with = "nullable")]
    pub field_slug_name: String,

    #[serde(rename = "DisplayName", alias = "displayName", deserialize_with = "nullable")]
    pub display_name: String,

    #[serde(rename = "Description", alias = "description", deserialize_with = "nullable")]
    pub description: String,

    #[serde(rename = "Name", alias = "name", deserialize_with = "nullable")]
    pub name: String,

    #[serde(rename = "ListType", alias = "listType", deserialize_with = "nullable")]
    pub list_type: String,

    #[serde(rename = "IsFile", alias = "isFile", deserialize_with = "nullable")]
    pub is_file: bool,

    #[serde(rename = "IsList", alias = "isList", deserialize_with = "nullable")]
    pub is_list: bool,

    #[serde(rename = "IsNotes", alias = "isNotes", deserialize_with = "nullable")]
    pub is_notes: bool,

    #[serde(rename = "IsPassword", alias = "isPassword", deserialize_with = "nullable")]
    pub is_password: bool,

    #[serde(rename = "IsRequired", alias = "isRequired", deserialize_with = "nullable")]
    pub is_required: bool,

    #[serde(rename = "IsUrl", alias = "isUrl", deserialize_with = "nullable")]
    pub is_url: bool,
}

impl SecretTemplate {
    /// Slug of the field with the given field ID.
    ///
    /// Linear scan; the first matching field wins.
    pub fn field_id_to_slug(&self, field_id: i64) -> Option<&str> {
        let found = self
            .fields
            .iter()
            .find(|field| field.secret_template_field_id == field_id);

        match found {
            Some(field) => {
                trace!(
                    "template field with slug '{}' matches the given ID '{}'",
                    field.field_slug_name,
                    field_id
                );
                Some(field.field_slug_name.as_str())
            }
            None => {
                trace!("no template field with id '{}' in template '{}'", field_id, self.name);
                None
            }
        }
    }

    /// Field ID of the field with the given slug.
    pub fn field_slug_to_id(&self, slug: &str) -> Option<i64> {
        self.get_field(slug).map(|field| field.secret_template_field_id)
    }

    /// Field definition with the given slug.
    ///
    /// Linear scan; the first matching field wins.
    pub fn get_field(&self, slug: &str) -> Option<&TemplateField> {
        let found = self.fields.iter().find(|field| field.field_slug_name == slug);

        match found {
            Some(field) => {
                trace!(
                    "template field with ID '{}' matches the given slug '{}'",
                    field.secret_template_field_id,
                    slug
                );
                Some(field)
            }
            None => {
                trace!("no template field with slug '{}' in template '{}'", slug, self.name);
                None
            }
        }
    }
}

impl TemplateField {
    /// A plain text field definition.
    pub fn new(id: i64, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            secret_template_field_id: id,
            name: slug.clone(),
            display_name: slug.clone(),
            field_slug_name: slug,
            ..Default::default()
        }
    }

    /// Mark the definition as a file attachment field.
    pub fn file(mut self) -> Self {
        self.is_file = true;
        self
    }

    /// Mark the definition as a password field.
    pub fn password(mut self) -> Self {
        self.is_password = true;
        self
    }

    /// Mark the definition as a multi-line notes field.
    pub fn notes(mut self) -> Self {
        self.is_notes = true;
        self
    }
}
