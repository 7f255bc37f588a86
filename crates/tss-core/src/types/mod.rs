//! Wire types for secrets and secret templates.
//!
//! Field names follow the server's PascalCase request format; responses are
//! accepted in either PascalCase or the camelCase the REST API returns.

mod secret;
mod template;

pub use secret::*;
pub use template::*;

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default.
///
/// The server sends `null` for unset IDs and strings (e.g. `fileAttachmentId`
/// on a field with no attachment).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}
