//! Tolerant field deserialization for loosely-typed engine exports.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field, falling back to `T::default()` when the value has
/// the wrong shape.
///
/// Engine exports are not schema-checked, so a `Name` that is sometimes an
/// object and sometimes a bare string must not poison the whole document.
/// Use together with `#[serde(default)]` so absent keys also default.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
