//! Export model and per-record decision logic for Dragonwilds catalog builds.
//!
//! Everything in this crate is a pure function of parsed export data (plus a
//! single existence check in the icon resolver). File walking, hashing and
//! output live in `dwe-lib`.

pub mod classify;
pub mod error;
pub mod export;
pub mod icon;
pub mod item_ref;
pub mod lenient;
pub mod normalize;
pub mod record;

pub use classify::{Classification, ClassificationRule, classify, sanitize_tag};
pub use error::ExportError;
pub use export::{
    ExportBlock, GameplayTag, LocalizedText, ObjectRef, first_non_empty, non_empty, parse_export,
    read_export,
};
pub use icon::{DEFAULT_CONTENT_PREFIX, IconResolution, IconResolver};
pub use item_ref::{extract_item_id, find_item_ids};
pub use normalize::{
    CanonicalItem, ItemProperties, normalize_item, normalize_plan_name, normalize_properties,
};
pub use record::{DefinitionRecord, PrimaryMarker, PrimaryStrategy, Selection};
