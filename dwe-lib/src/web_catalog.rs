//! Aggregated catalog for the web viewer.
//!
//! Walks the curated asset tree (one directory per inventory tab, item
//! documents below it) and writes a single `{tabs: {...}}` document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::error::PipelineError;
use crate::json::write_json;
use crate::scanner::is_ignored;
use crate::settings::TabSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebCatalog {
    pub tabs: BTreeMap<String, WebTab>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebTab {
    pub label: String,
    pub items: Vec<WebItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebItem {
    pub name: String,
    pub item_data: Value,
    pub max_stack: Value,
    pub icon_path: String,
    pub source_path: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_durability: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_level: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vital_shield: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct WebCatalogOptions {
    pub assets_root: PathBuf,
    /// Paths in the catalog are relative to this directory.
    pub base_root: PathBuf,
    pub outputs: Vec<PathBuf>,
    pub tabs: Vec<TabSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebCatalogSummary {
    /// Item count per tab key.
    pub tabs: BTreeMap<String, usize>,
    pub files_skipped: usize,
    pub outputs_written: usize,
}

/// Default asset and base roots below a repository root.
///
/// Prefers the published copy under `docs/`; falls back to the working tree.
pub fn default_roots(repo_root: &Path) -> (PathBuf, PathBuf) {
    let docs_assets = repo_root.join("docs").join("DWE").join("Assets");
    if docs_assets.is_dir() {
        (docs_assets, repo_root.join("docs"))
    } else {
        (repo_root.join("DWE").join("Assets"), repo_root.to_path_buf())
    }
}

/// Default output files below a repository root.
pub fn default_outputs(repo_root: &Path) -> Vec<PathBuf> {
    vec![
        repo_root.join("web").join("data").join("catalog.json"),
        repo_root.join("docs").join("data").join("catalog.json"),
    ]
}

/// `path` relative to `base`, always with `/` separators.
pub fn to_web_path(path: &Path, base: &Path) -> String {
    let relative = pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf());
    posix(&relative)
}

fn posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn present(data: &Map<String, Value>, key: &str) -> Option<Value> {
    data.get(key).filter(|v| !v.is_null()).cloned()
}

/// Build the catalog entry for one item document.
pub fn web_item(
    data: &Map<String, Value>,
    file: &Path,
    tab_dir: &Path,
    tab_name: &str,
    base: &Path,
) -> WebItem {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let icon_name = data
        .get("icon")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{stem}.png"));
    let parent = file.parent().unwrap_or(Path::new(""));
    let category = parent
        .strip_prefix(tab_dir)
        .ok()
        .map(posix)
        .filter(|rel| !rel.is_empty())
        .unwrap_or_else(|| tab_name.to_string());

    WebItem {
        name: data
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| stem.clone()),
        item_data: data.get("ItemData").cloned().unwrap_or(Value::Null),
        max_stack: data.get("max_stack").cloned().unwrap_or_else(|| Value::from(1)),
        icon_path: to_web_path(&parent.join(icon_name), base),
        source_path: to_web_path(file, base),
        category,
        description: present(data, "description"),
        base_durability: present(data, "BaseDurability"),
        power_level: present(data, "PowerLevel"),
        weight: present(data, "Weight"),
        vital_shield: present(data, "VitalShield"),
        equipment: present(data, "Equipment"),
    }
}

fn is_item_document(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !is_ignored(name) && name.to_lowercase().ends_with(".json")
}

fn read_document(path: &Path) -> Option<Map<String, Value>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("Read failed: {} ({})", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str::<Map<String, Value>>(&contents) {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("JSON parse failed: {} ({})", path.display(), e);
            None
        }
    }
}

/// Collect one tab's items, sorted by category then name.
pub fn collect_tab(tab_dir: &Path, tab_name: &str, base: &Path) -> (Vec<WebItem>, usize) {
    let mut items = Vec::new();
    let mut skipped = 0;
    if !tab_dir.is_dir() {
        log::warn!("Tab directory not found: {}", tab_dir.display());
        return (items, skipped);
    }
    let files = WalkDir::new(tab_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_item_document(e.path()));
    for entry in files {
        match read_document(entry.path()) {
            Some(data) => items.push(web_item(&data, entry.path(), tab_dir, tab_name, base)),
            None => skipped += 1,
        }
    }
    items.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
    (items, skipped)
}

/// Build the catalog in memory.
pub fn build_web_catalog(options: &WebCatalogOptions) -> (WebCatalog, WebCatalogSummary) {
    let mut catalog = WebCatalog::default();
    let mut summary = WebCatalogSummary::default();
    for tab in &options.tabs {
        let tab_dir = options.assets_root.join(&tab.dir);
        let (items, skipped) = collect_tab(&tab_dir, &tab.dir, &options.base_root);
        summary.files_skipped += skipped;
        summary.tabs.insert(tab.key(), items.len());
        catalog.tabs.insert(
            tab.key(),
            WebTab {
                label: tab.label.clone(),
                items,
            },
        );
    }
    (catalog, summary)
}

/// Build the catalog and write it to every output path.
pub fn write_web_catalog(options: &WebCatalogOptions) -> Result<WebCatalogSummary, PipelineError> {
    let (catalog, mut summary) = build_web_catalog(options);
    for output in &options.outputs {
        write_json(output, &catalog, false)?;
        log::info!("Wrote catalog: {}", output.display());
        summary.outputs_written += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_web_item_fields() {
        let data = doc(json!({
            "ItemData": "pid-1",
            "name": "Bread",
            "max_stack": 20,
            "icon": "ITEM_Bread.png",
            "description": "Tasty",
            "Weight": 0.5,
            "Equipment": null
        }));
        let item = web_item(
            &data,
            Path::new("docs/DWE/Assets/BagTab/Food/ITEM_Bread.json"),
            Path::new("docs/DWE/Assets/BagTab"),
            "BagTab",
            Path::new("docs"),
        );
        assert_eq!(item.name, "Bread");
        assert_eq!(item.icon_path, "DWE/Assets/BagTab/Food/ITEM_Bread.png");
        assert_eq!(item.source_path, "DWE/Assets/BagTab/Food/ITEM_Bread.json");
        assert_eq!(item.category, "Food");
        assert_eq!(item.weight, Some(json!(0.5)));
        assert_eq!(item.equipment, None);

        let out = serde_json::to_value(&item).unwrap();
        assert_eq!(out["itemData"], "pid-1");
        assert_eq!(out["maxStack"], 20);
        assert!(out.get("equipment").is_none());
        assert!(out.get("vitalShield").is_none());
    }

    #[test]
    fn test_top_level_category_and_defaults() {
        let item = web_item(
            &Map::new(),
            Path::new("A/RuneTab/Rune.json"),
            Path::new("A/RuneTab"),
            "RuneTab",
            Path::new("A"),
        );
        assert_eq!(item.category, "RuneTab");
        assert_eq!(item.name, "Rune");
        assert_eq!(item.icon_path, "RuneTab/Rune.png");
        assert_eq!(item.max_stack, json!(1));
        assert_eq!(item.item_data, Value::Null);
    }

    #[test]
    fn test_collect_tab_sorted_and_skips_bad_json() {
        let tmp = TempDir::new().unwrap();
        let tab = tmp.path().join("BagTab");
        fs::create_dir_all(tab.join("Tools")).unwrap();
        fs::create_dir_all(tab.join("Food")).unwrap();
        fs::write(tab.join("Tools/b.json"), r#"{"name": "Axe"}"#).unwrap();
        fs::write(tab.join("Food/a.json"), r#"{"name": "Pie"}"#).unwrap();
        fs::write(tab.join("Food/c.json"), r#"{"name": "Apple"}"#).unwrap();
        fs::write(tab.join("Food/broken.json"), "{").unwrap();
        fs::write(tab.join("desktop.ini"), "").unwrap();

        let (items, skipped) = collect_tab(&tab, "BagTab", tmp.path());
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Apple", "Pie", "Axe"]);
        assert_eq!(skipped, 1);
    }
}
