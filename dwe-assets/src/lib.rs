//! Maintenance tools for the curated asset tree and the web data files.
//!
//! These operate on the outputs of the catalog pipelines rather than on raw
//! exports: renaming table entries, pushing them into the asset tree, and
//! keeping hand-edited name maps in step with the data tables.

pub mod character;
pub mod data_table;
pub mod drop_tables;
pub mod error;
pub mod rename_assets;
pub mod sync;

pub use character::{CharacterSummary, write_character_catalog};
pub use drop_tables::{DropTableOptions, DropTableSummary, update_drop_tables};
pub use error::AssetError;
pub use rename_assets::{RenameSummary, rename_assets};
pub use sync::{SyncOptions, SyncSummary, sync_table_to_assets};
