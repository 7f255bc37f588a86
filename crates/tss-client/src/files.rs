//! File attachment reconciliation after a secret write.
//!
//! File fields never travel in the secret's JSON body. After the body is
//! written, each file field is either uploaded or, when empty, cleared with a
//! dirty patch. Fields are processed in order and the first failure stops the
//! pass, so earlier fields stay committed.

use crate::body::{RequestBody, SecretPatch};
use crate::error::{ClientError, Result};
use crate::resource::Resource;
use crate::transport::Transport;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Method;
use std::borrow::Cow;
use tracing::debug;
use tss_core::SecretField;

/// Filename used when a file field has none.
pub const DEFAULT_FILENAME: &str = "File.txt";

/// Extension appended to filenames that lack one.
pub const DEFAULT_EXTENSION: &str = ".txt";

static HAS_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.]+\.\w+$").expect("valid filename regex"));

/// The filename to upload under. The server needs a `name.ext` filename.
pub fn normalize_filename(filename: &str) -> Cow<'_, str> {
    if filename.is_empty() {
        debug!("field has no filename, setting its filename to '{}'", DEFAULT_FILENAME);
        Cow::Borrowed(DEFAULT_FILENAME)
    } else if !HAS_EXTENSION.is_match(filename) {
        let normalized = format!("{}{}", filename, DEFAULT_EXTENSION);
        debug!("field has no filename extension, setting its filename to '{}'", normalized);
        Cow::Owned(normalized)
    } else {
        Cow::Borrowed(filename)
    }
}

/// Upload or clear every file field of the secret `secret_id`.
pub(crate) async fn reconcile_file_fields<T>(
    transport: &T,
    secret_id: i64,
    file_fields: &[SecretField],
) -> Result<()>
where
    T: Transport + ?Sized,
{
    for field in file_fields {
        let outcome = if field.item_value.is_empty() {
            clear_file(transport, secret_id, &field.slug).await
        } else {
            let filename = normalize_filename(&field.filename);
            debug!(
                "uploading a file to the '{}' field with filename '{}'",
                field.slug, filename
            );
            transport
                .upload_file(secret_id, &field.slug, &filename, field.item_value.as_bytes())
                .await
        };

        outcome.map_err(|err| ClientError::file_field(&field.slug, err))?;
    }
    Ok(())
}

async fn clear_file<T>(transport: &T, secret_id: i64, slug: &str) -> Result<()>
where
    T: Transport + ?Sized,
{
    debug!("clearing the file attachment of the '{}' field", slug);
    let path = format!("{}/general", secret_id);
    let body = RequestBody::FieldPatch(SecretPatch::clear_field(slug));
    transport
        .request(Method::PATCH, Resource::Secrets, &path, Some(&body))
        .await?;
    Ok(())
}
