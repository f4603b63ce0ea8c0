//! Item cross-reference index.
//!
//! Recipes and spells refer to items by id; the lookup turns each id into
//! a display name and a copied icon. It is built once per run, before any
//! recipe or spell is read.

use std::collections::BTreeMap;
use std::path::Path;

use dwe_core::lenient::lenient;
use dwe_core::normalize::display_name;
use dwe_core::{
    DefinitionRecord, IconResolver, ItemProperties, ObjectRef, PrimaryStrategy, extract_item_id,
};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::icons::IconDirectory;
use crate::scanner::{FileConvention, scan_sources};

/// What a catalog needs to know about one referenced item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemDetails {
    pub item_id: String,
    pub display_name: String,
    pub persistence_id: String,
    pub internal_name: String,
    /// Icon file name inside the catalog's icon directory; may be empty.
    pub icon: String,
}

/// A quantity of an item, as written in recipe and spell documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemLine {
    #[serde(rename = "ItemData", default, deserialize_with = "lenient")]
    pub item_data: ObjectRef,

    #[serde(rename = "Count", default, deserialize_with = "lenient")]
    pub count: Option<i64>,
}

impl ItemLine {
    pub fn item_id(&self) -> String {
        extract_item_id(&self.item_data)
    }

    /// Quantity, 1 when absent.
    pub fn count(&self) -> i64 {
        self.count.unwrap_or(1)
    }
}

/// An item line joined against the lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLine {
    pub item_id: String,
    pub count: i64,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_id: Option<String>,
    pub icon: String,
}

impl ResolvedLine {
    /// A line can stand for a recipe's output.
    pub fn is_valid_output(&self) -> bool {
        !self.item_id.is_empty() && self.count > 0
    }
}

/// Item id → details. Later definitions of the same id replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ItemLookup {
    entries: BTreeMap<String, ItemDetails>,
}

impl ItemLookup {
    pub fn get(&self, item_id: &str) -> Option<&ItemDetails> {
        self.entries.get(item_id)
    }

    /// Insert, returning the entry that was replaced.
    pub fn insert(&mut self, details: ItemDetails) -> Option<ItemDetails> {
        self.entries.insert(details.item_id.clone(), details)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join a line against the index. Unknown ids keep the id as their
    /// display name and get an empty icon.
    pub fn resolve_line(&self, line: &ItemLine) -> ResolvedLine {
        let item_id = line.item_id();
        let details = self.get(&item_id);
        ResolvedLine {
            display_name: details
                .map(|d| d.display_name.clone())
                .unwrap_or_else(|| item_id.clone()),
            persistence_id: Some(details.map(|d| d.persistence_id.clone()).unwrap_or_default()),
            icon: details.map(|d| d.icon.clone()).unwrap_or_default(),
            count: line.count(),
            item_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupSummary {
    pub items_indexed: usize,
    pub icons_missing: usize,
    pub files_skipped: usize,
    /// Ids defined by more than one file.
    pub redefined: usize,
}

/// Details for one definition; the icon is left for the caller.
pub fn item_details(record: &DefinitionRecord) -> (ItemDetails, ItemProperties) {
    let block = record.primary();
    let props: ItemProperties = block.properties_as();
    let item_id = block.name().unwrap_or(record.file_stem()).to_string();
    let details = ItemDetails {
        display_name: display_name(&props, &item_id),
        persistence_id: props.persistence_id().to_string(),
        internal_name: props.internal_name().to_string(),
        icon: String::new(),
        item_id,
    };
    (details, props)
}

/// Index every item definition under `items_root`.
///
/// Icons are copied into `icons` as they resolve. An item without an icon
/// gets `placeholder` when one is given.
pub fn build_item_lookup(
    items_root: &Path,
    conventions: &[FileConvention],
    resolver: &IconResolver,
    icons: &mut IconDirectory,
    placeholder: Option<&str>,
) -> Result<(ItemLookup, LookupSummary), PipelineError> {
    let files = scan_sources(&[items_root.to_path_buf()], conventions, "Items")?;
    let mut lookup = ItemLookup::default();
    let mut summary = LookupSummary::default();

    for path in &files {
        let record = match DefinitionRecord::load(path, PrimaryStrategy::PROPERTIES) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("{}", e);
                summary.files_skipped += 1;
                continue;
            }
        };
        let (mut details, props) = item_details(&record);

        let resolution = resolver.resolve(props.icon_path());
        if let Some(problem) = resolution.problem(path, props.icon_path()) {
            summary.icons_missing += 1;
            log::warn!("{}", problem);
        }
        details.icon = icons
            .import_resolved(&resolution)?
            .or_else(|| placeholder.map(str::to_string))
            .unwrap_or_default();

        if let Some(previous) = lookup.insert(details) {
            log::debug!(
                "Item {} redefined by {}",
                previous.item_id,
                path.display()
            );
            summary.redefined += 1;
        }
        summary.items_indexed += 1;
    }

    Ok((lookup, summary))
}
