//! Spell catalog builder.

use std::path::PathBuf;

use dwe_core::lenient::lenient;
use dwe_core::{
    DefinitionRecord, IconResolution, IconResolver, LocalizedText, ObjectRef, PrimaryStrategy,
    first_non_empty,
};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::dedup::PlacementStats;
use crate::error::PipelineError;
use crate::icons::IconDirectory;
use crate::json::write_json;
use crate::lookup::{ItemLine, ItemLookup, LookupSummary, ResolvedLine, build_item_lookup};
use crate::scanner::{FileConvention, ensure_roots, scan_sources};

/// Blocks whose `Type` or `Class` contains this list a spell's item costs.
pub const COST_MODULE_MARKER: &str = "SpellModule_CostItems";

#[derive(Debug, Clone, Default, Deserialize)]
struct SpellProperties {
    #[serde(rename = "PersistenceID", default, deserialize_with = "lenient")]
    persistence_id: Option<String>,

    #[serde(rename = "InternalName", default, deserialize_with = "lenient")]
    internal_name: Option<String>,

    #[serde(rename = "SpellDisplayName", default, deserialize_with = "lenient")]
    display_name: Option<LocalizedText>,

    #[serde(rename = "SpecialRequirementsText", default, deserialize_with = "lenient")]
    requirements: Option<LocalizedText>,

    #[serde(rename = "CooldownDuration", default, deserialize_with = "lenient")]
    cooldown: Option<Number>,

    #[serde(rename = "SpellIcon", default, deserialize_with = "lenient")]
    spell_icon: Option<ObjectRef>,

    #[serde(rename = "SpellTagIcon", default, deserialize_with = "lenient")]
    spell_tag_icon: Option<ObjectRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CostModuleProperties {
    #[serde(rename = "ItemsCostInfo", default, deserialize_with = "lenient")]
    items_cost_info: Vec<ItemLine>,
}

/// One spell as written to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellEntry {
    pub persistence_id: String,
    pub display_name: String,
    pub requirements: String,
    /// `null` when the spell has no cooldown.
    pub cooldown: Option<Number>,
    pub spell_icon: String,
    pub spell_tag_icon: String,
    pub costs: Vec<ResolvedLine>,
    pub internal_name: String,
}

fn localized_chain(text: Option<&LocalizedText>) -> Option<&str> {
    first_non_empty([
        text.and_then(LocalizedText::source),
        text.and_then(LocalizedText::localized),
    ])
}

/// Build the catalog entry for one spell, icons left empty.
pub fn spell_entry(record: &DefinitionRecord, lookup: &ItemLookup) -> SpellEntry {
    let block = record.primary();
    let props: SpellProperties = block.properties_as();

    let display_name = first_non_empty([
        localized_chain(props.display_name.as_ref()),
        block.name(),
        Some(record.file_stem()),
    ])
    .unwrap_or_default()
    .to_string();

    let costs = record
        .blocks_of_kind(COST_MODULE_MARKER)
        .flat_map(|module| module.properties_as::<CostModuleProperties>().items_cost_info)
        .map(|line| ResolvedLine {
            persistence_id: None,
            ..lookup.resolve_line(&line)
        })
        .collect();

    SpellEntry {
        persistence_id: props.persistence_id.unwrap_or_default(),
        display_name,
        requirements: localized_chain(props.requirements.as_ref())
            .unwrap_or_default()
            .to_string(),
        cooldown: props.cooldown,
        spell_icon: String::new(),
        spell_tag_icon: String::new(),
        costs,
        internal_name: props.internal_name.unwrap_or_default(),
    }
}

#[derive(Debug, Clone)]
pub struct SpellCatalogOptions {
    pub spells_root: PathBuf,
    pub items_root: PathBuf,
    pub content_root: PathBuf,
    pub content_prefix: String,
    pub output: PathBuf,
    pub icons_dir: PathBuf,
    /// Source image used for spells without an icon.
    pub placeholder: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpellCatalogSummary {
    pub lookup: LookupSummary,
    pub spells_indexed: usize,
    pub spells_skipped: usize,
    pub icons_missing: usize,
    pub icons: PlacementStats,
}

/// Build the spell catalog and copy its icons.
pub fn build_spell_catalog(
    options: &SpellCatalogOptions,
) -> Result<SpellCatalogSummary, PipelineError> {
    ensure_roots(&[options.spells_root.clone()], "Spells")?;
    ensure_roots(&[options.items_root.clone()], "Items")?;

    let resolver = IconResolver::new(&options.content_root).with_prefix(&options.content_prefix);
    let mut icons = IconDirectory::new(&options.icons_dir, &options.content_root, options.dry_run);
    let placeholder = icons.provision_placeholder(&options.placeholder)?;

    let (lookup, lookup_summary) = build_item_lookup(
        &options.items_root,
        &[FileConvention::ITEM],
        &resolver,
        &mut icons,
        None,
    )?;

    let mut summary = SpellCatalogSummary {
        lookup: lookup_summary,
        ..Default::default()
    };
    let mut spells = Vec::new();

    let files = scan_sources(
        &[options.spells_root.clone()],
        &[FileConvention::SPELL],
        "Spells",
    )?;
    for path in &files {
        let record = match DefinitionRecord::load(path, PrimaryStrategy::SPELL) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Spell data missing: {}", e);
                summary.spells_skipped += 1;
                continue;
            }
        };
        let mut entry = spell_entry(&record, &lookup);
        let props: SpellProperties = record.primary().properties_as();

        let spell_icon_ref = props.spell_icon.as_ref().and_then(ObjectRef::path).unwrap_or_default();
        let resolution = resolver.resolve(spell_icon_ref);
        if let Some(problem) = resolution.problem(path, spell_icon_ref) {
            summary.icons_missing += 1;
            log::warn!("Spell {}", problem);
        }
        entry.spell_icon = icons
            .import_resolved(&resolution)?
            .or_else(|| placeholder.clone())
            .unwrap_or_default();

        let tag_ref = props.spell_tag_icon.as_ref().and_then(ObjectRef::path).unwrap_or_default();
        let tag_resolution = resolver.resolve(tag_ref);
        if let IconResolution::NotFound { .. } = tag_resolution {
            summary.icons_missing += 1;
            log::warn!("Tag icon not found: {} -> {}", path.display(), tag_ref);
        }
        entry.spell_tag_icon = icons.import_resolved(&tag_resolution)?.unwrap_or_default();

        spells.push(entry);
        summary.spells_indexed += 1;
    }

    summary.icons = *icons.stats();
    if options.dry_run {
        log::info!("Dry run: not writing {}", options.output.display());
    } else {
        write_json(&options.output, &spells, true)?;
        log::info!("Wrote spell catalog: {}", options.output.display());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::ItemDetails;
    use dwe_core::parse_export;
    use std::path::Path;

    fn record(json: &str) -> DefinitionRecord {
        let path = Path::new("USD_Fireball.json");
        DefinitionRecord::from_blocks(parse_export(json, path).unwrap(), path, PrimaryStrategy::SPELL)
            .unwrap()
    }

    #[test]
    fn test_spell_entry_fields() {
        let rec = record(
            r#"[
            {"Type": "SpellModule_CostItems_C", "Properties": {"ItemsCostInfo": [
                {"ItemData": {"ObjectName": "X'ITEM_Rune_Fire'"}, "Count": 2}
            ]}},
            {"Name": "USD_Fireball", "Properties": {
                "PersistenceID": "s-1",
                "InternalName": "Fireball",
                "SpellDisplayName": {"LocalizedString": "Fire Ball"},
                "SpecialRequirementsText": {"SourceString": "Needs a staff"}
            }}]"#,
        );
        let mut lookup = ItemLookup::default();
        lookup.insert(ItemDetails {
            item_id: "ITEM_Rune_Fire".to_string(),
            display_name: "Fire Rune".to_string(),
            icon: "T_Rune_Fire.png".to_string(),
            ..Default::default()
        });

        let entry = spell_entry(&rec, &lookup);
        assert_eq!(entry.persistence_id, "s-1");
        assert_eq!(entry.display_name, "Fire Ball");
        assert_eq!(entry.requirements, "Needs a staff");
        assert_eq!(entry.cooldown, None);
        assert_eq!(entry.costs.len(), 1);
        assert_eq!(entry.costs[0].display_name, "Fire Rune");
        assert_eq!(entry.costs[0].count, 2);
        assert_eq!(entry.costs[0].persistence_id, None);
    }

    #[test]
    fn test_cooldown_serializes_null() {
        let rec = record(
            r#"[{"Properties": {"PersistenceID": "s", "SpellDisplayName": {"SourceString": "X"}}}]"#,
        );
        let value = serde_json::to_value(spell_entry(&rec, &ItemLookup::default())).unwrap();
        assert!(value["cooldown"].is_null());
        assert!(value["costs"][0].is_null());
    }

    #[test]
    fn test_document_without_spell_block_is_rejected() {
        let path = Path::new("USD_Other.json");
        let blocks = parse_export(r#"[{"Properties": {"PersistenceID": "x"}}]"#, path).unwrap();
        assert!(DefinitionRecord::from_blocks(blocks, path, PrimaryStrategy::SPELL).is_err());
    }
}
