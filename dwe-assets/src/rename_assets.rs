//! Renames item documents and their icons after the item's display name.
//!
//! Works folder by folder: names only need to be unique within a folder.
//! An item whose files already carry its name is left alone, so running
//! the renamer twice changes nothing the second time.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use dwe_lib::TABLE_INDEX_FILE;
use dwe_lib::json::to_ascii_pretty;
use dwe_lib::scanner::{FileConvention, scan_convention};
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::AssetError;

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("static regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Make a display name usable as a file stem on every platform.
pub fn sanitize_filename(name: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(name, "_");
    let collapsed = WHITESPACE_RUN.replace_all(&replaced, " ");
    let trimmed = collapsed.trim().trim_end_matches([' ', '.']);
    if trimmed.is_empty() {
        "item".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub items_processed: usize,
    pub json_renamed: usize,
    pub images_renamed: usize,
    pub warnings: usize,
}

fn string_field<'a>(data: &'a Map<String, Value>, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).map(str::trim).unwrap_or_default()
}

fn stem_of(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Renames within one folder, tracking names claimed so far.
struct FolderRenamer<'a> {
    folder: &'a Path,
    claimed: HashSet<String>,
}

impl<'a> FolderRenamer<'a> {
    fn new(folder: &'a Path) -> Self {
        Self {
            folder,
            claimed: HashSet::new(),
        }
    }

    /// A stem is free unless claimed this run or held on disk by a file that
    /// is not one of the current item's own files.
    fn is_free(&self, stem: &str, icon_ext: &str, own: &[&Path]) -> bool {
        if self.claimed.contains(stem) {
            return false;
        }
        [format!("{stem}.json"), format!("{stem}{icon_ext}")]
            .iter()
            .map(|name| self.folder.join(name))
            .all(|path| !path.exists() || own.contains(&path.as_path()))
    }

    fn claim(&mut self, base: &str, icon_ext: &str, own: &[&Path]) -> String {
        let mut candidate = base.to_string();
        let mut index = 2;
        while !self.is_free(&candidate, icon_ext, own) {
            candidate = format!("{base} ({index})");
            index += 1;
        }
        self.claimed.insert(candidate.clone());
        candidate
    }
}

fn rename(from: &Path, to: &Path) -> Result<(), AssetError> {
    fs::rename(from, to).map_err(|e| AssetError::io(from, e))
}

/// Rename every item document under `root` (and its icon) after its name.
pub fn rename_assets(root: &Path) -> Result<RenameSummary, AssetError> {
    if !root.is_dir() {
        return Err(AssetError::not_found("Root", root));
    }
    let mut folders: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for path in scan_convention(root, &FileConvention::ANY_JSON) {
        let Some(folder) = path.parent().map(Path::to_path_buf) else {
            continue;
        };
        if folder == root && path.file_name().is_some_and(|n| n == TABLE_INDEX_FILE) {
            continue;
        }
        folders.entry(folder).or_default().push(path);
    }
    let mut summary = RenameSummary::default();
    if folders.is_empty() {
        log::warn!("No json files found under: {}", root.display());
        return Ok(summary);
    }

    for (folder, files) in &folders {
        let mut renamer = FolderRenamer::new(folder);
        for json_path in files {
            rename_item(json_path, &mut renamer, &mut summary)?;
        }
    }
    Ok(summary)
}

fn rename_item(
    json_path: &Path,
    renamer: &mut FolderRenamer<'_>,
    summary: &mut RenameSummary,
) -> Result<(), AssetError> {
    let original = fs::read_to_string(json_path).map_err(|e| AssetError::io(json_path, e))?;
    let mut data = match serde_json::from_str::<Value>(&original) {
        Ok(Value::Object(data)) => data,
        Ok(_) => {
            log::warn!("Unexpected JSON shape: {}", json_path.display());
            summary.warnings += 1;
            return Ok(());
        }
        Err(e) => {
            log::warn!("JSON parse failed: {} ({})", json_path.display(), e);
            summary.warnings += 1;
            return Ok(());
        }
    };

    let mut name = string_field(&data, "name").to_string();
    if name.is_empty() {
        let icon_stem = stem_of(string_field(&data, "icon"));
        name = if icon_stem.is_empty() {
            stem_of(&json_path.to_string_lossy())
        } else {
            icon_stem
        };
        data.insert("name".to_string(), Value::String(name.clone()));
        summary.warnings += 1;
        log::warn!("Missing name patched: {} -> {}", json_path.display(), name);
    }

    let icon_name = string_field(&data, "icon").to_string();
    let icon_ext = Path::new(&icon_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_else(|| ".png".to_string());
    let icon_path = (!icon_name.is_empty()).then(|| renamer.folder.join(&icon_name));

    let mut own: Vec<&Path> = vec![json_path];
    if let Some(icon) = &icon_path {
        own.push(icon);
    }
    let base = renamer.claim(&sanitize_filename(&name), &icon_ext, &own);

    if let Some(icon) = icon_path.as_deref().filter(|p| p.is_file()) {
        let new_icon_name = format!("{base}{icon_ext}");
        if icon_name != new_icon_name {
            rename(icon, &renamer.folder.join(&new_icon_name))?;
            summary.images_renamed += 1;
        }
        data.insert("icon".to_string(), Value::String(new_icon_name));
    }

    let new_json_path = renamer.folder.join(format!("{base}.json"));
    let moved = new_json_path != json_path;
    if moved {
        rename(json_path, &new_json_path)?;
        summary.json_renamed += 1;
    }

    let bytes = to_ascii_pretty(&data).map_err(|e| AssetError::json(json_path, e))?;
    if moved || bytes != original.as_bytes() {
        fs::write(&new_json_path, bytes).map_err(|e| AssetError::io(&new_json_path, e))?;
    }
    summary.items_processed += 1;
    Ok(())
}
