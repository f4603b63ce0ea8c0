//! Source scanner for exported definition trees.
//!
//! Finds definition files by naming convention under one or more roots.
//! Output order is deterministic: roots in the order given, conventions in
//! the order given, then lexicographic path order within each.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::PipelineError;

/// File names never treated as definitions, whatever their extension.
pub const IGNORED_FILE_NAMES: &[&str] = &["desktop.ini", "Thumbs.db", ".DS_Store"];

/// A filename prefix plus extension that identifies one kind of definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileConvention {
    pub prefix: &'static str,
    pub extension: &'static str,
}

impl FileConvention {
    pub const ITEM: Self = Self::json("ITEM_");
    pub const DATA_ASSET: Self = Self::json("DA_");
    pub const CONSUMABLE: Self = Self::json("DA_Consumable_");
    pub const RECIPE: Self = Self::json("RECIPE_");
    pub const SPELL: Self = Self::json("USD_");
    /// Every JSON document.
    pub const ANY_JSON: Self = Self::json("");

    pub const fn json(prefix: &'static str) -> Self {
        Self {
            prefix,
            extension: "json",
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if is_ignored(name) {
            return false;
        }
        let extension_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension);
        extension_matches && name.starts_with(self.prefix)
    }
}

/// True for OS metadata files that live alongside real assets.
pub fn is_ignored(file_name: &str) -> bool {
    IGNORED_FILE_NAMES
        .iter()
        .any(|ignored| ignored.eq_ignore_ascii_case(file_name))
}

/// Fail fast when any declared root is missing.
pub fn ensure_roots(roots: &[PathBuf], kind: &'static str) -> Result<(), PipelineError> {
    match roots.iter().find(|root| !root.is_dir()) {
        Some(missing) => Err(PipelineError::missing_root(kind, missing)),
        None => Ok(()),
    }
}

/// All files below `root` matching `convention`, sorted by path.
///
/// Unreadable directory entries are skipped.
pub fn scan_convention(root: &Path, convention: &FileConvention) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && convention.matches(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    found.sort();
    found
}

/// Scan every root for every convention.
///
/// Returns [`PipelineError::MissingRoot`] before scanning anything if a root
/// does not exist.
pub fn scan_sources(
    roots: &[PathBuf],
    conventions: &[FileConvention],
    kind: &'static str,
) -> Result<Vec<PathBuf>, PipelineError> {
    ensure_roots(roots, kind)?;
    let mut files = Vec::new();
    for root in roots {
        for convention in conventions {
            files.extend(scan_convention(root, convention));
        }
    }
    Ok(files)
}
