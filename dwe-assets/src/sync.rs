//! Pushes regenerated table files over their curated copies in the asset tree.
//!
//! Files are matched by name alone (case-insensitive), wherever they sit in
//! the asset tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use dwe_lib::TABLE_INDEX_FILE;
use dwe_lib::scanner::is_ignored;
use walkdir::WalkDir;

use crate::error::AssetError;

const SYNCED_EXTENSIONS: &[&str] = &["json", "png"];

fn is_synced_file(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| !is_ignored(n));
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SYNCED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(e)));
    name_ok && ext_ok
}

fn synced_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_synced_file(e.path()))
        .map(|e| e.into_path())
        .collect()
}

fn index_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Lower-cased file name → every asset with that name.
pub fn build_asset_index(assets_root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut index: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in synced_files(assets_root) {
        index.entry(index_key(&path)).or_default().push(path);
    }
    index
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub table_root: PathBuf,
    pub assets_root: PathBuf,
    pub dry_run: bool,
    /// Remove each table file once it has been copied over its matches.
    pub delete_matched: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub scanned: usize,
    pub replaced: usize,
    pub deleted: usize,
    pub missing: usize,
    pub multiple_matches: usize,
}

/// Copy every table file over each same-named asset.
pub fn sync_table_to_assets(options: &SyncOptions) -> Result<SyncSummary, AssetError> {
    if !options.table_root.is_dir() {
        return Err(AssetError::not_found("Table", &options.table_root));
    }
    if !options.assets_root.is_dir() {
        return Err(AssetError::not_found("Assets", &options.assets_root));
    }

    let index = build_asset_index(&options.assets_root);
    let table_index = options.table_root.join(TABLE_INDEX_FILE);
    let table_files: Vec<PathBuf> = synced_files(&options.table_root)
        .into_iter()
        .filter(|p| *p != table_index)
        .collect();

    let mut summary = SyncSummary {
        scanned: table_files.len(),
        ..Default::default()
    };
    for table_file in &table_files {
        let Some(targets) = index.get(&index_key(table_file)) else {
            summary.missing += 1;
            log::warn!("No asset match for: {}", table_file.display());
            continue;
        };
        if targets.len() > 1 {
            summary.multiple_matches += 1;
            log::warn!(
                "Multiple asset matches for: {}",
                table_file.file_name().unwrap_or_default().to_string_lossy()
            );
        }
        for target in targets {
            if options.dry_run {
                log::info!("[DRYRUN] {} -> {}", table_file.display(), target.display());
            } else {
                fs::copy(table_file, target).map_err(|e| AssetError::io(target, e))?;
            }
            summary.replaced += 1;
        }
        if options.delete_matched {
            if options.dry_run {
                log::info!("[DRYRUN] delete {}", table_file.display());
            } else {
                fs::remove_file(table_file).map_err(|e| AssetError::io(table_file, e))?;
            }
            summary.deleted += 1;
        }
    }
    Ok(summary)
}
