//! Name-stub maintenance for the loot drop table.
//!
//! The web viewer shows enemy and item names through two hand-translated
//! stub maps. When the loot table changes, the stubs gain the new keys
//! (empty), lose the vanished ones, and keep every existing translation.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use dwe_core::find_item_ids;
use dwe_lib::json::write_json;
use serde_json::{Map, Value};

use crate::data_table::{read_value, sorted_row_names, table_rows};
use crate::error::AssetError;

pub const LOOT_TABLE_FILE: &str = "DT_LootDropTable.json";
pub const ENEMY_NAMES_FILE: &str = "DT_LootDropTable_EnemyNames.json";
pub const ITEM_NAMES_FILE: &str = "DT_LootDropTable_ItemNames.json";

/// Source file in the loot directory → published file in the web directory.
pub const WEB_TARGETS: &[(&str, &str)] = &[
    (LOOT_TABLE_FILE, "loot_drop_table.json"),
    (ENEMY_NAMES_FILE, "loot_drop_table_enemy_names.json"),
    (ITEM_NAMES_FILE, "loot_drop_table_item_names.json"),
];

#[derive(Debug, Clone)]
pub struct DropTableOptions {
    pub loot_dir: PathBuf,
    pub web_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropTableSummary {
    pub enemies: usize,
    pub items: usize,
    /// Keys that already had a non-empty name.
    pub names_kept: usize,
    pub files_published: usize,
}

/// Every item id spawned by any row, sorted and unique.
pub fn spawned_item_ids(loot_table: &Value) -> Vec<String> {
    let mut ids = BTreeSet::new();
    let rows = table_rows(loot_table).into_iter().flat_map(|rows| rows.values());
    for row in rows {
        let resources = row.get("Resources").and_then(Value::as_array);
        for resource in resources.into_iter().flatten() {
            let object_name = resource
                .get("SpawnedItemData")
                .and_then(|d| d.get("ObjectName"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            ids.extend(find_item_ids(object_name));
        }
    }
    ids.into_iter().collect()
}

/// Rebuild a stub over `keys`, carrying over existing values.
pub fn merge_stub(keys: &[String], existing: &Map<String, Value>) -> (Map<String, Value>, usize) {
    let mut kept = 0;
    let stub = keys
        .iter()
        .map(|key| {
            let value = existing
                .get(key)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));
            if value.as_str().is_some_and(|s| !s.is_empty()) {
                kept += 1;
            }
            (key.clone(), value)
        })
        .collect();
    (stub, kept)
}

fn load_stub(path: &Path) -> Map<String, Value> {
    if !path.is_file() {
        return Map::new();
    }
    match read_value(path) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::warn!("Stub is not an object, starting fresh: {}", path.display());
            Map::new()
        }
        Err(e) => {
            log::warn!("{}; starting fresh", e);
            Map::new()
        }
    }
}

fn update_stub(path: &Path, keys: &[String]) -> Result<usize, AssetError> {
    let (stub, kept) = merge_stub(keys, &load_stub(path));
    write_json(path, &stub, true)?;
    log::info!("Updated {} ({} entries)", path.display(), keys.len());
    Ok(kept)
}

/// Refresh both stubs from the loot table, then publish all three files.
pub fn update_drop_tables(options: &DropTableOptions) -> Result<DropTableSummary, AssetError> {
    let loot_path = options.loot_dir.join(LOOT_TABLE_FILE);
    if !loot_path.is_file() {
        return Err(AssetError::not_found("Loot table", loot_path));
    }
    let loot_table = read_value(&loot_path)?;

    let enemies = sorted_row_names(&loot_table);
    let items = spawned_item_ids(&loot_table);
    let mut summary = DropTableSummary {
        enemies: enemies.len(),
        items: items.len(),
        ..Default::default()
    };
    summary.names_kept += update_stub(&options.loot_dir.join(ENEMY_NAMES_FILE), &enemies)?;
    summary.names_kept += update_stub(&options.loot_dir.join(ITEM_NAMES_FILE), &items)?;

    fs::create_dir_all(&options.web_dir).map_err(|e| AssetError::io(&options.web_dir, e))?;
    for (source, target) in WEB_TARGETS {
        let from = options.loot_dir.join(source);
        let to = options.web_dir.join(target);
        fs::copy(&from, &to).map_err(|e| AssetError::io(&from, e))?;
        log::info!("Copied {} -> {}", from.display(), to.display());
        summary.files_published += 1;
    }
    Ok(summary)
}
