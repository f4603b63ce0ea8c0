//! Catalog pipelines over Dragonwilds exports.
//!
//! Each builder scans its source trees, normalizes what it finds with
//! `dwe-core`, places files through the [`Deduplicator`] and returns a
//! summary of what happened. Per-file problems are logged and counted;
//! only missing inputs and output failures abort a run.

pub mod collect;
pub mod dedup;
pub mod error;
pub mod hasher;
pub mod icons;
pub mod item_table;
pub mod json;
pub mod lookup;
pub mod recipes;
pub mod scanner;
pub mod settings;
pub mod spells;
pub mod web_catalog;

pub use collect::{CollectOptions, CollectSummary, collect_recipes};
pub use dedup::{
    Deduplicator, Layout, Placement, PlacementKind, PlacementPolicy, PlacementStats, SlotProbe,
};
pub use error::PipelineError;
pub use hasher::ContentHash;
pub use item_table::{ItemTableOptions, ItemTableSummary, TABLE_INDEX_FILE, build_item_tables};
pub use lookup::{ItemDetails, ItemLookup};
pub use recipes::{RecipeIndexOptions, RecipeIndexSummary, build_recipe_index};
pub use settings::{Settings, load_settings};
pub use spells::{SpellCatalogOptions, SpellCatalogSummary, build_spell_catalog};
pub use web_catalog::{WebCatalogOptions, WebCatalogSummary, write_web_catalog};
