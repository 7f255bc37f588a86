//! Error types for the TSS core.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON5 parse error: {0}")]
    Json5(String),
}

/// A secret's fields do not line up with its template.
///
/// Raised during classification, before anything is sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field id '{field_id}' is not defined on the secret template with id '{template_id}'")]
    FieldIdNotDefined { field_id: i64, template_id: i64 },

    #[error("field name '{slug}' is not defined on the secret template with id '{template_id}'")]
    FieldNameNotDefined { slug: String, template_id: i64 },
}
