//! Field normalization for item definitions.
//!
//! Each canonical field has exactly one fallback-chain function below, so
//! every default is decided in one place.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::export::{GameplayTag, LocalizedText, ObjectRef, first_non_empty};
use crate::lenient::lenient;
use crate::record::DefinitionRecord;

static PLAN_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^PLAN\s*[:_-]\s*").expect("static regex"));

/// Typed view over an item definition's `Properties`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemProperties {
    #[serde(rename = "PersistenceID", default, deserialize_with = "lenient")]
    pub persistence_id: Option<String>,

    #[serde(rename = "InternalName", default, deserialize_with = "lenient")]
    pub internal_name: Option<String>,

    #[serde(rename = "Name", default, deserialize_with = "lenient")]
    pub name: Option<LocalizedText>,

    #[serde(rename = "Description", default, deserialize_with = "lenient")]
    pub description: Option<LocalizedText>,

    #[serde(rename = "FlavourText", default, deserialize_with = "lenient")]
    pub flavour_text: Option<LocalizedText>,

    #[serde(rename = "BuffDatas", default, deserialize_with = "lenient")]
    pub buff_datas: Vec<BuffData>,

    #[serde(rename = "MaxStackSize", default, deserialize_with = "lenient")]
    pub max_stack_size: Option<Number>,

    #[serde(rename = "Icon", default, deserialize_with = "lenient")]
    pub icon: Option<ObjectRef>,

    #[serde(rename = "BaseDurability", default, deserialize_with = "lenient")]
    pub base_durability: Option<Number>,

    #[serde(rename = "PowerLevel", default, deserialize_with = "lenient")]
    pub power_level: Option<Number>,

    #[serde(rename = "Weight", default, deserialize_with = "lenient")]
    pub weight: Option<Number>,

    #[serde(rename = "ItemFilterTags", default, deserialize_with = "lenient")]
    pub item_filter_tags: Vec<String>,

    #[serde(rename = "Category", default, deserialize_with = "lenient")]
    pub category: Option<GameplayTag>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuffData {
    #[serde(rename = "Description", default, deserialize_with = "lenient")]
    pub description: Option<LocalizedText>,
}

impl ItemProperties {
    pub fn persistence_id(&self) -> &str {
        self.persistence_id.as_deref().unwrap_or_default()
    }

    pub fn internal_name(&self) -> &str {
        self.internal_name.as_deref().unwrap_or_default()
    }

    pub fn icon_path(&self) -> &str {
        self.icon
            .as_ref()
            .and_then(ObjectRef::path)
            .unwrap_or_default()
    }

    pub fn category_tag(&self) -> Option<&str> {
        self.category
            .as_ref()
            .and_then(|c| c.tag_name.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// A normalized item as written to the item tables.
///
/// Serialized key names and order match the table documents the web
/// tools consume. Fields marked `skip` are pipeline-internal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalItem {
    #[serde(rename = "ItemData")]
    pub id: String,

    #[serde(rename = "name")]
    pub display_name: String,

    pub max_stack: Number,

    pub icon: String,

    pub description: String,

    #[serde(rename = "Equipment", skip_serializing_if = "Option::is_none")]
    pub equipment_slot: Option<String>,

    #[serde(rename = "VitalShield", skip_serializing_if = "Option::is_none")]
    pub vital_shield: Option<u32>,

    #[serde(rename = "BaseDurability", skip_serializing_if = "Option::is_none")]
    pub durability: Option<Number>,

    #[serde(rename = "PowerLevel", skip_serializing_if = "Option::is_none")]
    pub power_level: Option<Number>,

    #[serde(rename = "Weight", skip_serializing_if = "Option::is_none")]
    pub weight: Option<Number>,

    #[serde(skip)]
    pub internal_name: String,

    /// Engine path of the icon, unresolved.
    #[serde(skip)]
    pub icon_ref: String,

    /// Assigned group; filled in after classification.
    #[serde(skip)]
    pub category: String,
}

/// Normalize the primary block of an item definition.
///
/// Never fails: every absent field degrades to its default. `icon` and
/// `category` are left empty for the icon resolver and classifier.
pub fn normalize_item(record: &DefinitionRecord) -> CanonicalItem {
    let props: ItemProperties = record.primary().properties_as();
    normalize_properties(&props, record.file_stem())
}

/// Normalize already-typed properties; `file_stem` is the last-resort name.
pub fn normalize_properties(props: &ItemProperties, file_stem: &str) -> CanonicalItem {
    CanonicalItem {
        id: props.persistence_id().to_string(),
        display_name: display_name(props, file_stem),
        max_stack: max_stack(props),
        icon: String::new(),
        description: description(props),
        equipment_slot: None,
        vital_shield: None,
        durability: props.base_durability.clone(),
        power_level: props.power_level.clone(),
        weight: props.weight.clone(),
        internal_name: props.internal_name().to_string(),
        icon_ref: props.icon_path().to_string(),
        category: String::new(),
    }
}

/// Source string, then localized string, then internal name, then `fallback`.
pub fn display_name(props: &ItemProperties, fallback: &str) -> String {
    let name = props.name.as_ref();
    first_non_empty([
        name.and_then(LocalizedText::source),
        name.and_then(LocalizedText::localized),
        props.internal_name.as_deref(),
    ])
    .unwrap_or(fallback)
    .to_string()
}

/// Description, then flavour text, then the first buff's description.
pub fn description(props: &ItemProperties) -> String {
    first_non_empty([
        props.description.as_ref().and_then(LocalizedText::source),
        props.flavour_text.as_ref().and_then(LocalizedText::source),
        props
            .buff_datas
            .first()
            .and_then(|b| b.description.as_ref())
            .and_then(LocalizedText::source),
    ])
    .unwrap_or_default()
    .to_string()
}

/// `MaxStackSize` as exported, or 1.
pub fn max_stack(props: &ItemProperties) -> Number {
    props.max_stack_size.clone().unwrap_or_else(|| Number::from(1))
}

/// Strip a leading `PLAN:` style prefix from a plan item's name.
pub fn normalize_plan_name(name: &str) -> String {
    let trimmed = name.trim();
    PLAN_PREFIX.replace(trimmed, "").into_owned()
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
