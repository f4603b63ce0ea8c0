//! Item identifiers inside references to item definitions.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::export::ObjectRef;

static ITEM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(ITEM_[A-Za-z0-9_]+|DA_[A-Za-z0-9_]+)").expect("static regex"));

/// Item id referenced by an `ItemData` object reference.
///
/// The first `ITEM_…`/`DA_…` token in `ObjectName` wins; otherwise the file
/// stem of `ObjectPath`; otherwise empty.
pub fn extract_item_id(item_data: &ObjectRef) -> String {
    if let Some(found) = item_data.name().and_then(|name| ITEM_ID.find(name)) {
        return found.as_str().to_string();
    }
    item_data
        .path()
        .and_then(|p| Path::new(p).file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Every item id token in `text`, in order of appearance.
pub fn find_item_ids(text: &str) -> Vec<String> {
    ITEM_ID
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: Option<&str>, path: Option<&str>) -> ObjectRef {
        ObjectRef {
            object_name: name.map(str::to_string),
            object_path: path.map(str::to_string),
        }
    }

    #[test]
    fn test_id_from_object_name() {
        let item = object(Some("BlueprintGeneratedClass'ITEM_Axe_Bronze_C'"), None);
        assert_eq!(extract_item_id(&item), "ITEM_Axe_Bronze_C");
    }

    #[test]
    fn test_da_prefix_matches() {
        let item = object(Some("ItemData'DA_Consumable_Plan_Bed'"), None);
        assert_eq!(extract_item_id(&item), "DA_Consumable_Plan_Bed");
    }

    #[test]
    fn test_id_falls_back_to_path_stem() {
        let item = object(
            Some("Something'Else'"),
            Some("RSDragonwilds/Content/Gameplay/Items/Wood/Log.0"),
        );
        assert_eq!(extract_item_id(&item), "Log");
    }

    #[test]
    fn test_empty_reference() {
        assert_eq!(extract_item_id(&ObjectRef::default()), "");
    }

    #[test]
    fn test_find_all_ids() {
        let ids = find_item_ids("ITEM_Ore_Copper, DA_Rune_Air and ITEM_Ore_Tin");
        assert_eq!(ids, vec!["ITEM_Ore_Copper", "DA_Rune_Air", "ITEM_Ore_Tin"]);
    }
}
