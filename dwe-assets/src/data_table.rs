//! Engine data-table documents.
//!
//! A data table export is either `[{"Rows": {...}}, ...]` or a bare
//! `{"Rows": {...}}` object. Row keys are the table's row names.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::AssetError;

/// Read any JSON document.
pub fn read_value(path: &Path) -> Result<Value, AssetError> {
    let contents = std::fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| AssetError::json(path, e))
}

/// The `Rows` map of a data table, if it has one.
pub fn table_rows(table: &Value) -> Option<&Map<String, Value>> {
    let holder = match table {
        Value::Array(blocks) => blocks.first()?,
        Value::Object(_) => table,
        _ => return None,
    };
    holder.get("Rows")?.as_object()
}

/// Row names, sorted.
pub fn sorted_row_names(table: &Value) -> Vec<String> {
    let mut names: Vec<String> = table_rows(table)
        .map(|rows| rows.keys().cloned().collect())
        .unwrap_or_default();
    names.sort();
    names
}
