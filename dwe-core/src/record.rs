//! Primary-block selection.
//!
//! An export is a heterogeneous block array; exactly one block carries the
//! gameplay properties a catalog needs. Which block that is depends on the
//! catalog, so selection is an explicit [`PrimaryStrategy`]: a marker test
//! plus whether the first block may stand in when no block is marked.

use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::export::{ExportBlock, read_export};

/// What identifies the primary block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryMarker {
    /// `Properties.PersistenceID` is a non-empty string (item definitions).
    PersistenceId,
    /// `Properties` is a non-empty map (recipes, item lookups).
    NonEmptyProperties,
    /// Both `Properties.SpellDisplayName` and `Properties.PersistenceID` are set.
    SpellDefinition,
}

impl PrimaryMarker {
    pub fn matches(self, block: &ExportBlock) -> bool {
        match self {
            PrimaryMarker::PersistenceId => block.property_str("PersistenceID").is_some(),
            PrimaryMarker::NonEmptyProperties => !block.properties.is_empty(),
            PrimaryMarker::SpellDefinition => {
                block.has_property("SpellDisplayName") && block.has_property("PersistenceID")
            }
        }
    }
}

/// Marker plus tie-break: the first marked block wins; when none is marked,
/// block 0 is used only if `fallback_to_first` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryStrategy {
    pub marker: PrimaryMarker,
    pub fallback_to_first: bool,
}

impl PrimaryStrategy {
    /// Item definitions for the item tables.
    pub const ITEM: Self = Self {
        marker: PrimaryMarker::PersistenceId,
        fallback_to_first: true,
    };

    /// Recipe documents and item cross-reference lookups.
    pub const PROPERTIES: Self = Self {
        marker: PrimaryMarker::NonEmptyProperties,
        fallback_to_first: true,
    };

    /// Spell definitions. No fallback: an unrelated first block would
    /// produce a bogus spell.
    pub const SPELL: Self = Self {
        marker: PrimaryMarker::SpellDefinition,
        fallback_to_first: false,
    };

    /// Pick the primary block index.
    pub fn select(&self, blocks: &[ExportBlock]) -> Option<(usize, Selection)> {
        if let Some(index) = blocks.iter().position(|b| self.marker.matches(b)) {
            return Some((index, Selection::Marked));
        }
        if self.fallback_to_first && !blocks.is_empty() {
            return Some((0, Selection::FirstBlockFallback));
        }
        None
    }
}

/// How the primary block was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Marked,
    /// No block carried the marker; block 0 was taken as a last resort and
    /// may be unrelated to the catalog.
    FirstBlockFallback,
}

/// A parsed export with its primary block identified.
#[derive(Debug, Clone)]
pub struct DefinitionRecord {
    pub source: PathBuf,
    pub blocks: Vec<ExportBlock>,
    pub primary_index: usize,
    pub selection: Selection,
}

impl DefinitionRecord {
    /// Identify the primary block among already-parsed blocks.
    pub fn from_blocks(
        blocks: Vec<ExportBlock>,
        source: &Path,
        strategy: PrimaryStrategy,
    ) -> Result<Self, ExportError> {
        let (primary_index, selection) = strategy
            .select(&blocks)
            .ok_or_else(|| ExportError::NoPrimaryRecord(source.display().to_string()))?;
        Ok(Self {
            source: source.to_path_buf(),
            blocks,
            primary_index,
            selection,
        })
    }

    /// Read, parse and select in one step.
    pub fn load(path: &Path, strategy: PrimaryStrategy) -> Result<Self, ExportError> {
        let blocks = read_export(path)?;
        Self::from_blocks(blocks, path, strategy)
    }

    pub fn primary(&self) -> &ExportBlock {
        &self.blocks[self.primary_index]
    }

    /// Every block whose `Type` or `Class` contains `marker`, in order.
    pub fn blocks_of_kind<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a ExportBlock> {
        self.blocks.iter().filter(move |b| b.is_kind(marker))
    }

    /// Source filename without extension.
    pub fn file_stem(&self) -> &str {
        self.source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    pub fn used_fallback(&self) -> bool {
        self.selection == Selection::FirstBlockFallback
    }
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
