//! Raw export documents: an ordered array of typed blocks.
//!
//! Blocks keep their `Properties` as an untyped map; typed views over it
//! (items, recipes, spells) are produced on demand with
//! [`ExportBlock::properties_as`].

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ExportError;
use crate::lenient::lenient;

/// One element of an export document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportBlock {
    #[serde(rename = "Type", default, deserialize_with = "lenient")]
    pub type_name: Option<String>,

    #[serde(rename = "Name", default, deserialize_with = "lenient")]
    pub name: Option<String>,

    #[serde(rename = "Class", default, deserialize_with = "lenient")]
    pub class: Option<String>,

    #[serde(rename = "Properties", default, deserialize_with = "lenient")]
    pub properties: Map<String, Value>,
}

impl ExportBlock {
    /// Typed view over this block's properties.
    ///
    /// Property structs are built from lenient fields only, so this never
    /// fails; a block without properties yields `T::default()`.
    pub fn properties_as<T: DeserializeOwned + Default>(&self) -> T {
        serde_json::from_value(Value::Object(self.properties.clone())).unwrap_or_default()
    }

    /// A non-empty string property, if present.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        non_empty(self.properties.get(key).and_then(Value::as_str))
    }

    /// True when the value under `key` is present and not empty/null/false/zero.
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.get(key).is_some_and(is_truthy)
    }

    /// The block's `Name`, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    /// True if either the `Type` or the `Class` name contains `marker`.
    pub fn is_kind(&self, marker: &str) -> bool {
        [self.type_name.as_deref(), self.class.as_deref()]
            .into_iter()
            .flatten()
            .any(|kind| kind.contains(marker))
    }
}

/// A localizable text property (`FText` in the engine).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(rename = "SourceString", default, deserialize_with = "lenient")]
    pub source_string: Option<String>,

    #[serde(rename = "LocalizedString", default, deserialize_with = "lenient")]
    pub localized_string: Option<String>,
}

impl LocalizedText {
    pub fn source(&self) -> Option<&str> {
        non_empty(self.source_string.as_deref())
    }

    pub fn localized(&self) -> Option<&str> {
        non_empty(self.localized_string.as_deref())
    }
}

/// A soft reference to another asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectRef {
    #[serde(rename = "ObjectName", default, deserialize_with = "lenient")]
    pub object_name: Option<String>,

    #[serde(rename = "ObjectPath", default, deserialize_with = "lenient")]
    pub object_path: Option<String>,
}

impl ObjectRef {
    pub fn path(&self) -> Option<&str> {
        non_empty(self.object_path.as_deref())
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(self.object_name.as_deref())
    }
}

/// A gameplay tag container entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameplayTag {
    #[serde(rename = "TagName", default, deserialize_with = "lenient")]
    pub tag_name: Option<String>,
}

/// Treat an empty string as absent.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// First candidate that is present and non-empty.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates.into_iter().find_map(non_empty)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Parse an export document from its text.
///
/// The root must be a non-empty array. Elements that are not objects are
/// kept as empty blocks so block indices stay aligned with the source.
pub fn parse_export(contents: &str, path: &Path) -> Result<Vec<ExportBlock>, ExportError> {
    let root: Value = serde_json::from_str(contents).map_err(|source| ExportError::Json {
        path: path.display().to_string(),
        source,
    })?;

    let elements = match root {
        Value::Array(elements) if !elements.is_empty() => elements,
        _ => return Err(ExportError::UnexpectedRoot(path.display().to_string())),
    };

    Ok(elements
        .into_iter()
        .map(|element| ExportBlock::deserialize(element).unwrap_or_default())
        .collect())
}

/// Read and parse an export document from disk.
pub fn read_export(path: &Path) -> Result<Vec<ExportBlock>, ExportError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_export(&contents, path)
}
