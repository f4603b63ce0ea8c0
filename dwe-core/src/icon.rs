//! Engine asset path → icon file resolution.
//!
//! Exported references look like `RSDragonwilds/Content/UI/Icons/T_Axe.0`.
//! The matching image lives at `<content root>/UI/Icons/T_Axe.png`. There
//! is no search: the rewritten path exists or it does not.

use std::path::{Path, PathBuf};

/// Engine mount prefix stripped from object paths.
pub const DEFAULT_CONTENT_PREFIX: &str = "RSDragonwilds/Content/";

const OBJECT_INDEX_SUFFIX: &str = ".0";
const ICON_EXTENSION: &str = "png";

/// Outcome of resolving one icon reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconResolution {
    Resolved(PathBuf),
    /// The record had no icon reference at all.
    MissingReference,
    /// The reference was rewritten but nothing exists at `candidate`.
    NotFound { candidate: PathBuf },
}

impl IconResolution {
    pub fn path(&self) -> Option<&Path> {
        match self {
            IconResolution::Resolved(p) => Some(p),
            _ => None,
        }
    }

    /// The warning for an unresolved icon, or `None` once resolved.
    ///
    /// A record without any reference and a reference that points nowhere
    /// are reported differently.
    pub fn problem(&self, source: &Path, engine_path: &str) -> Option<String> {
        match self {
            IconResolution::Resolved(_) => None,
            IconResolution::MissingReference => {
                Some(format!("Icon missing: {}", source.display()))
            }
            IconResolution::NotFound { .. } => Some(format!(
                "Icon not found: {} -> {}",
                source.display(),
                engine_path
            )),
        }
    }
}

/// Rewrite an engine object path into a path relative to the content root.
///
/// Returns `None` for an empty reference.
pub fn engine_path_to_relative(engine_path: &str, content_prefix: &str) -> Option<PathBuf> {
    if engine_path.is_empty() {
        return None;
    }
    let cleaned = if content_prefix.is_empty() {
        engine_path.to_string()
    } else {
        engine_path.replace(content_prefix, "")
    };
    let cleaned = cleaned
        .strip_suffix(OBJECT_INDEX_SUFFIX)
        .unwrap_or(&cleaned);
    Some(PathBuf::from(format!("{cleaned}.{ICON_EXTENSION}")))
}

/// Resolves icon references against one content root.
#[derive(Debug, Clone)]
pub struct IconResolver {
    content_root: PathBuf,
    content_prefix: String,
}

impl IconResolver {
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            content_prefix: DEFAULT_CONTENT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_prefix = prefix.into();
        self
    }

    pub fn resolve(&self, engine_path: &str) -> IconResolution {
        let Some(relative) = engine_path_to_relative(engine_path, &self.content_prefix) else {
            return IconResolution::MissingReference;
        };
        let candidate = self.content_root.join(relative);
        if candidate.is_file() {
            IconResolution::Resolved(candidate)
        } else {
            IconResolution::NotFound { candidate }
        }
    }
}

#[cfg(test)]
#[path = "tests/icon_tests.rs"]
mod tests;
