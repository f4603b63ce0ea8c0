//! Recipe index builder.
//!
//! Joins every `RECIPE_*.json` against the item lookup and writes one JSON
//! array of display-ready recipes. Recipes that create nothing are skipped.

use std::path::PathBuf;

use dwe_core::lenient::lenient;
use dwe_core::{DefinitionRecord, IconResolver, PrimaryStrategy, first_non_empty};
use serde::{Deserialize, Serialize};

use crate::dedup::PlacementStats;
use crate::error::PipelineError;
use crate::icons::IconDirectory;
use crate::json::write_json;
use crate::lookup::{ItemLine, ItemLookup, LookupSummary, ResolvedLine, build_item_lookup};
use crate::scanner::{FileConvention, ensure_roots, scan_sources};

#[derive(Debug, Clone, Default, Deserialize)]
struct RecipeProperties {
    #[serde(rename = "InternalName", default, deserialize_with = "lenient")]
    internal_name: Option<String>,

    #[serde(rename = "PersistenceID", default, deserialize_with = "lenient")]
    persistence_id: Option<String>,

    #[serde(rename = "OnCraftXpEvent", default, deserialize_with = "lenient")]
    on_craft_xp_event: Option<XpEvent>,

    #[serde(rename = "ItemsConsumed", default, deserialize_with = "lenient")]
    items_consumed: Vec<ItemLine>,

    #[serde(rename = "ItemsCreated", default, deserialize_with = "lenient")]
    items_created: Vec<ItemLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct XpEvent {
    #[serde(rename = "RowName", default, deserialize_with = "lenient")]
    row_name: Option<String>,
}

/// One recipe as written to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeEntry {
    pub name: String,
    pub internal_name: String,
    pub persistence_id: String,
    pub row_name: String,
    pub display_name: String,
    pub icon: String,
    pub items_created: Vec<ResolvedLine>,
    pub items_consumed: Vec<ResolvedLine>,
}

/// Per-line icon counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTally {
    pub icons_missing: usize,
    pub placeholders_used: usize,
}

/// Join lines against the lookup, substituting `placeholder` for missing icons.
fn resolve_lines(
    lines: &[ItemLine],
    lookup: &ItemLookup,
    placeholder: Option<&str>,
    tally: &mut LineTally,
) -> Vec<ResolvedLine> {
    lines
        .iter()
        .map(|line| {
            let mut resolved = lookup.resolve_line(line);
            if resolved.icon.is_empty() {
                tally.icons_missing += 1;
                if let Some(placeholder) = placeholder {
                    resolved.icon = placeholder.to_string();
                    tally.placeholders_used += 1;
                }
            }
            resolved
        })
        .collect()
}

/// Build the index entry for one recipe document.
///
/// Returns `None` when no created line has an item id and a positive count.
/// The line counters in `tally` are updated either way.
pub fn recipe_entry(
    record: &DefinitionRecord,
    lookup: &ItemLookup,
    placeholder: Option<&str>,
    tally: &mut LineTally,
) -> Option<RecipeEntry> {
    let block = record.primary();
    let props: RecipeProperties = block.properties_as();

    let items_consumed = resolve_lines(&props.items_consumed, lookup, placeholder, tally);
    let items_created = resolve_lines(&props.items_created, lookup, placeholder, tally);

    let output = items_created.iter().find(|line| line.is_valid_output())?;
    let display_name = first_non_empty([Some(output.display_name.as_str()), block.name()])
        .unwrap_or_default()
        .to_string();
    let icon = output.icon.clone();

    Some(RecipeEntry {
        name: block.name.clone().unwrap_or_default(),
        internal_name: props.internal_name.unwrap_or_default(),
        persistence_id: props.persistence_id.unwrap_or_default(),
        row_name: props
            .on_craft_xp_event
            .and_then(|e| e.row_name)
            .unwrap_or_default(),
        display_name,
        icon,
        items_created,
        items_consumed,
    })
}

#[derive(Debug, Clone)]
pub struct RecipeIndexOptions {
    pub recipes_root: PathBuf,
    pub items_root: PathBuf,
    pub content_root: PathBuf,
    pub content_prefix: String,
    pub output: PathBuf,
    pub icons_dir: PathBuf,
    /// Source image copied in as the placeholder icon.
    pub placeholder: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeIndexSummary {
    pub lookup: LookupSummary,
    pub recipes_indexed: usize,
    pub recipes_skipped: usize,
    pub files_skipped: usize,
    pub lines: LineTally,
    pub icons: PlacementStats,
}

/// Build the recipe index and copy every referenced icon.
pub fn build_recipe_index(options: &RecipeIndexOptions) -> Result<RecipeIndexSummary, PipelineError> {
    ensure_roots(&[options.recipes_root.clone()], "Recipes")?;
    ensure_roots(&[options.items_root.clone()], "Items")?;

    let resolver = IconResolver::new(&options.content_root).with_prefix(&options.content_prefix);
    let mut icons = IconDirectory::new(&options.icons_dir, &options.content_root, options.dry_run);
    let placeholder = icons.provision_placeholder(&options.placeholder)?;

    let (lookup, lookup_summary) = build_item_lookup(
        &options.items_root,
        &[FileConvention::ITEM, FileConvention::DATA_ASSET],
        &resolver,
        &mut icons,
        placeholder.as_deref(),
    )?;

    let mut summary = RecipeIndexSummary {
        lookup: lookup_summary,
        ..Default::default()
    };
    let mut recipes = Vec::new();

    let files = scan_sources(
        &[options.recipes_root.clone()],
        &[FileConvention::RECIPE],
        "Recipes",
    )?;
    for path in &files {
        let record = match DefinitionRecord::load(path, PrimaryStrategy::PROPERTIES) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("{}", e);
                summary.files_skipped += 1;
                continue;
            }
        };
        match recipe_entry(&record, &lookup, placeholder.as_deref(), &mut summary.lines) {
            Some(entry) => {
                recipes.push(entry);
                summary.recipes_indexed += 1;
            }
            None => {
                log::debug!("Recipe creates nothing: {}", path.display());
                summary.recipes_skipped += 1;
            }
        }
    }

    summary.icons = *icons.stats();
    if options.dry_run {
        log::info!("Dry run: not writing {}", options.output.display());
    } else {
        write_json(&options.output, &recipes, true)?;
        log::info!("Wrote recipe catalog: {}", options.output.display());
    }
    Ok(summary)
}
