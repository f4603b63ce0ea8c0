//! A shared icon directory fed through the deduplicator.
//!
//! The recipe and spell catalogs reference icons by file name only, so every
//! icon from every source lands flat in one directory. Identical images
//! collapse to one file; different images with the same name are renamed
//! after their origin folder.

use std::path::{Path, PathBuf};

use dwe_core::IconResolution;

use crate::dedup::{Deduplicator, Layout, PlacementPolicy, PlacementStats, origin_of};
use crate::error::PipelineError;

#[derive(Debug)]
pub struct IconDirectory {
    dir: PathBuf,
    content_root: PathBuf,
    dedup: Deduplicator,
}

impl IconDirectory {
    pub fn new(dir: impl Into<PathBuf>, content_root: impl Into<PathBuf>, dry_run: bool) -> Self {
        let policy = PlacementPolicy {
            layout: Layout::Flat,
            overwrite: false,
        };
        Self {
            dir: dir.into(),
            content_root: content_root.into(),
            dedup: Deduplicator::new(policy).dry_run(dry_run),
        }
    }

    /// Copy an icon in and return the file name it ended up under.
    pub fn import(&mut self, source: &Path) -> Result<String, PipelineError> {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let origin = origin_of(source, &self.content_root);
        let placement = self
            .dedup
            .place_file_as(source, &file_name, &origin, &self.dir)?;
        log::debug!(
            "Icon {}: {} -> {}",
            placement.kind.label(),
            source.display(),
            placement.path.display()
        );
        Ok(placement.file_name())
    }

    /// Import a resolved icon; anything else yields `None`.
    pub fn import_resolved(
        &mut self,
        resolution: &IconResolution,
    ) -> Result<Option<String>, PipelineError> {
        match resolution.path() {
            Some(path) => self.import(path).map(Some),
            None => Ok(None),
        }
    }

    /// Import a placeholder image if it exists; warn and return `None` if not.
    pub fn provision_placeholder(&mut self, source: &Path) -> Result<Option<String>, PipelineError> {
        if !source.is_file() {
            log::warn!("Placeholder icon missing: {}", source.display());
            return Ok(None);
        }
        self.import(source).map(Some)
    }

    pub fn stats(&self) -> &PlacementStats {
        self.dedup.stats()
    }
}
