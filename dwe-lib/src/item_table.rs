//! Item-table builder.
//!
//! Classifies every item definition into a group directory and writes, per
//! item, a normalized JSON document plus its icon. All writes go through one
//! [`Deduplicator`], so rerunning over unchanged exports writes nothing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dwe_core::{
    CanonicalItem, DefinitionRecord, IconResolution, IconResolver, ItemProperties,
    PrimaryStrategy, classify, normalize_plan_name, normalize_properties,
};
use serde::Serialize;

use crate::dedup::{Deduplicator, Layout, PlacementPolicy, PlacementStats, origin_of};
use crate::error::PipelineError;
use crate::json::{to_ascii_pretty, write_json};
use crate::scanner::{FileConvention, ensure_roots, scan_convention};

/// Name of the combined index written at the table root.
pub const TABLE_INDEX_FILE: &str = "index.json";

/// Equipment slots recognized under `Gameplay/Character/Player/Equipment`.
pub const EQUIPMENT_SLOTS: &[&str] = &["Body", "Cape", "Head", "Jewellery", "Legs"];

const EQUIPMENT_ROOT: &[&str] = &["Gameplay", "Character", "Player", "Equipment"];

/// Consumable folders (under the content root) whose items get a fixed group.
pub const CONSUMABLE_GROUPS: &[(&str, &str)] = &[
    ("Gameplay/Items/Consumables/Plans", "Plans"),
    ("Gameplay/Items/Consumables/Vestiges", "Vestiges"),
];

const PLANS_GROUP: &str = "Plans";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemGroup {
    pub items: Vec<CanonicalItem>,
}

/// Group key → items, as written to the table index.
pub type ItemTable = BTreeMap<String, ItemGroup>;

/// Where an item definition sits in the equipment tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipmentContext {
    pub vital_shield: bool,
    pub slot: Option<&'static str>,
}

/// Derive equipment facts from a definition's path.
///
/// Any path with both a `Gameplay` and an `Equipment` component carries a
/// vital shield; the slot is the component right after
/// `Gameplay/Character/Player/Equipment`.
pub fn equipment_context(path: &Path) -> EquipmentContext {
    let parts: Vec<&str> = path
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    let vital_shield = parts.contains(&"Gameplay") && parts.contains(&"Equipment");
    if !vital_shield {
        return EquipmentContext::default();
    }
    let slot = parts
        .windows(EQUIPMENT_ROOT.len() + 1)
        // The slot must be a directory, not the file itself.
        .take(parts.len().saturating_sub(EQUIPMENT_ROOT.len() + 1))
        .find(|w| w[..EQUIPMENT_ROOT.len()] == *EQUIPMENT_ROOT)
        .and_then(|w| {
            EQUIPMENT_SLOTS
                .iter()
                .copied()
                .find(|slot| *slot == w[EQUIPMENT_ROOT.len()])
        });
    EquipmentContext { vital_shield, slot }
}

#[derive(Debug, Clone)]
pub struct ItemTableOptions {
    pub sources: Vec<PathBuf>,
    pub table_dir: PathBuf,
    pub content_root: PathBuf,
    pub content_prefix: String,
    /// Image copied in for items whose icon does not resolve.
    pub placeholder: PathBuf,
    pub overwrite: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemTableSummary {
    pub groups: usize,
    pub items_processed: usize,
    pub item_json_written: usize,
    pub icons_copied: usize,
    pub icons_missing: usize,
    pub placeholder_icons_copied: usize,
    pub files_skipped: usize,
    /// Records classified with more than one filter tag.
    pub tag_conflicts: usize,
    /// Records whose primary block was the first-block fallback.
    pub fallback_records: usize,
    pub placements: PlacementStats,
}

/// Accumulates items across sources.
pub struct ItemTableBuilder<'a> {
    options: &'a ItemTableOptions,
    resolver: IconResolver,
    dedup: Deduplicator,
    placeholder: Option<&'a Path>,
    table: ItemTable,
    summary: ItemTableSummary,
}

impl<'a> ItemTableBuilder<'a> {
    pub fn new(options: &'a ItemTableOptions) -> Self {
        let policy = PlacementPolicy {
            layout: Layout::Flat,
            overwrite: options.overwrite,
        };
        let placeholder = if options.placeholder.is_file() {
            Some(options.placeholder.as_path())
        } else {
            log::warn!("Placeholder icon missing: {}", options.placeholder.display());
            None
        };
        Self {
            options,
            resolver: IconResolver::new(&options.content_root)
                .with_prefix(&options.content_prefix),
            dedup: Deduplicator::new(policy).dry_run(options.dry_run),
            placeholder,
            table: ItemTable::new(),
            summary: ItemTableSummary::default(),
        }
    }

    /// Add one definition file. `source_root` names its origin for renames;
    /// `group_override` bypasses classification.
    pub fn add_file(
        &mut self,
        path: &Path,
        source_root: &Path,
        group_override: Option<&str>,
    ) -> Result<(), PipelineError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if file_name.contains("_MeshData") {
            log::debug!("Skipping mesh data: {}", path.display());
            return Ok(());
        }

        let record = match DefinitionRecord::load(path, PrimaryStrategy::ITEM) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("{}", e);
                self.summary.files_skipped += 1;
                return Ok(());
            }
        };
        if record.used_fallback() {
            log::warn!("No PersistenceID block, using first block: {}", path.display());
            self.summary.fallback_records += 1;
        }

        let props: ItemProperties = record.primary().properties_as();
        let mut item = normalize_properties(&props, record.file_stem());

        let group = match group_override {
            Some(group) => group.to_string(),
            None => {
                let classification = classify(&props.item_filter_tags, props.category_tag());
                if classification.has_conflict() {
                    log::warn!(
                        "Multiple ItemFilterTags, using last: {} -> {:?}",
                        path.display(),
                        classification.conflicting
                    );
                    self.summary.tag_conflicts += 1;
                }
                classification.group
            }
        };
        if group == PLANS_GROUP {
            item.display_name = normalize_plan_name(&item.display_name);
        }

        let equipment = equipment_context(path);
        if equipment.vital_shield {
            item.vital_shield = Some(0);
        }
        item.equipment_slot = equipment.slot.map(str::to_string);
        item.category = group.clone();

        let dest_dir = self.options.table_dir.join(&group);
        let resolved_icon = self.place_icon(&mut item, path, &dest_dir)?;

        let document_name = document_name(&item, resolved_icon.as_deref(), record.file_stem());
        let bytes = to_ascii_pretty(&item)?;
        let placement = self.dedup.place_owned_bytes(
            &bytes,
            &document_name,
            &origin_of(path, source_root),
            &dest_dir,
        )?;
        if placement.kind.writes() {
            self.summary.item_json_written += 1;
        }
        log::debug!(
            "Item {}: {} -> {}",
            placement.kind.label(),
            path.display(),
            placement.path.display()
        );

        self.table.entry(group).or_default().items.push(item);
        self.summary.items_processed += 1;
        Ok(())
    }

    /// Copy the item's icon (or the placeholder) next to its document and
    /// store the final file name in `item.icon`. Returns the resolved icon's
    /// own file name when the real icon was used.
    fn place_icon(
        &mut self,
        item: &mut CanonicalItem,
        path: &Path,
        dest_dir: &Path,
    ) -> Result<Option<String>, PipelineError> {
        let resolution = self.resolver.resolve(&item.icon_ref);
        if let Some(problem) = resolution.problem(path, &item.icon_ref) {
            self.summary.icons_missing += 1;
            log::warn!("{}", problem);
        }
        match resolution {
            IconResolution::Resolved(icon) => {
                let ext = icon
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "png".to_string());
                let own_name = icon
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let icon_name = if item.internal_name.is_empty() {
                    own_name.clone()
                } else {
                    format!("{}.{}", item.internal_name, ext)
                };
                let origin = origin_of(&icon, &self.options.content_root);
                let placement = self
                    .dedup
                    .place_owned_file_as(&icon, &icon_name, &origin, dest_dir)?;
                if placement.kind.writes() {
                    self.summary.icons_copied += 1;
                }
                item.icon = placement.file_name();
                Ok(Some(own_name))
            }
            IconResolution::MissingReference | IconResolution::NotFound { .. } => {
                if let Some(placeholder) = self.placeholder {
                    let base = [item.internal_name.as_str(), item.id.as_str()]
                        .into_iter()
                        .find(|s| !s.is_empty())
                        .unwrap_or("item");
                    let placement = self.dedup.place_owned_file_as(
                        placeholder,
                        &format!("{base}.png"),
                        "placeholder",
                        dest_dir,
                    )?;
                    self.summary.placeholder_icons_copied += 1;
                    item.icon = placement.file_name();
                }
                Ok(None)
            }
        }
    }

    /// Add every `DA_Consumable_*` file from the fixed consumable folders.
    pub fn add_consumable_groups(&mut self) -> Result<(), PipelineError> {
        for (relative, group) in CONSUMABLE_GROUPS {
            let root = self.options.content_root.join(relative);
            if !root.is_dir() {
                log::warn!("{} folder not found: {}", group, root.display());
                continue;
            }
            for path in scan_convention(&root, &FileConvention::CONSUMABLE) {
                self.add_file(&path, &root, Some(group))?;
            }
        }
        Ok(())
    }

    /// Sort items and produce the table plus final counters.
    pub fn finish(mut self) -> (ItemTable, ItemTableSummary) {
        for group in self.table.values_mut() {
            group
                .items
                .sort_by(|a, b| (&a.category, &a.display_name).cmp(&(&b.category, &b.display_name)));
        }
        self.summary.groups = self.table.len();
        self.summary.placements = *self.dedup.stats();
        (self.table, self.summary)
    }
}

/// Per-item document name: internal name, else the icon's stem, else the id,
/// else the source file stem.
fn document_name(item: &CanonicalItem, resolved_icon: Option<&str>, file_stem: &str) -> String {
    let icon_stem = resolved_icon
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|s| s.to_str());
    let base = [Some(item.internal_name.as_str()), icon_stem, Some(item.id.as_str())]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or(file_stem);
    format!("{base}.json")
}

/// Build every group directory and the table index.
pub fn build_item_tables(options: &ItemTableOptions) -> Result<ItemTableSummary, PipelineError> {
    ensure_roots(&options.sources, "Source")?;

    let mut builder = ItemTableBuilder::new(options);
    for source in &options.sources {
        for path in scan_convention(source, &FileConvention::ITEM) {
            builder.add_file(&path, source, None)?;
        }
    }
    builder.add_consumable_groups()?;

    let (table, summary) = builder.finish();
    let index = options.table_dir.join(TABLE_INDEX_FILE);
    if options.dry_run {
        log::info!("Dry run: not writing {}", index.display());
    } else {
        write_json(&index, &table, true)?;
    }
    Ok(summary)
}
