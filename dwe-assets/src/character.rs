//! Character-customization catalog: the option names of each editor slot.

use std::path::Path;

use serde::{Serialize, Serializer};

use dwe_lib::json::write_json;

use crate::data_table::{read_value, sorted_row_names};
use crate::error::AssetError;

/// Catalog key and the data table that lists its options.
pub const CUSTOMIZATION_TABLES: &[(&str, &str)] = &[
    ("BodyType", "DT_Customization_BodyType.json"),
    ("Head", "DT_Customization_FaceType.json"),
    ("HairPreset", "DT_Customization_HairPresets.json"),
    ("FacialHairPreset", "DT_Customization_FacialHairPresets.json"),
    ("SkinTone", "DT_Customization_SkinTone.json"),
    ("HairColor", "DT_Customization_HairColor.json"),
    ("EyeColor", "DT_Customization_EyeColor.json"),
    ("EyebrowColor", "DT_Customization_EyebrowColor.json"),
];

/// Slot → sorted option names, in [`CUSTOMIZATION_TABLES`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterCatalog {
    pub slots: Vec<(String, Vec<String>)>,
}

impl Serialize for CharacterCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.slots.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterSummary {
    pub tables_read: usize,
    pub tables_missing: usize,
}

/// Read every customization table under `source_dir`.
///
/// A missing table yields an empty option list and a warning.
pub fn build_character_catalog(
    source_dir: &Path,
) -> Result<(CharacterCatalog, CharacterSummary), AssetError> {
    if !source_dir.is_dir() {
        return Err(AssetError::not_found("Source directory", source_dir));
    }
    let mut catalog = CharacterCatalog::default();
    let mut summary = CharacterSummary::default();
    for (key, file_name) in CUSTOMIZATION_TABLES {
        let path = source_dir.join(file_name);
        let options = if path.is_file() {
            summary.tables_read += 1;
            sorted_row_names(&read_value(&path)?)
        } else {
            log::warn!("Missing table: {}", path.display());
            summary.tables_missing += 1;
            Vec::new()
        };
        catalog.slots.push((key.to_string(), options));
    }
    Ok((catalog, summary))
}

/// Build the catalog and write it to `output`.
pub fn write_character_catalog(
    source_dir: &Path,
    output: &Path,
) -> Result<CharacterSummary, AssetError> {
    let (catalog, summary) = build_character_catalog(source_dir)?;
    write_json(output, &catalog, true)?;
    log::info!("Wrote catalog: {}", output.display());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_catalog_keeps_slot_order_and_sorts_rows() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("DT_Customization_SkinTone.json"),
            r#"[{"Rows": {"Tone_2": {}, "Tone_1": {}}}]"#,
        )
        .unwrap();

        let (catalog, summary) = build_character_catalog(tmp.path()).unwrap();
        assert_eq!(summary.tables_read, 1);
        assert_eq!(summary.tables_missing, 7);
        assert_eq!(catalog.slots[0].0, "BodyType");
        assert!(catalog.slots[0].1.is_empty());
        assert_eq!(catalog.slots[4], ("SkinTone".to_string(), vec!["Tone_1".to_string(), "Tone_2".to_string()]));

        let text = serde_json::to_string(&catalog).unwrap();
        assert!(text.starts_with(r#"{"BodyType":[],"Head":[]"#));
    }

    #[test]
    fn test_missing_source_dir() {
        let tmp = TempDir::new().unwrap();
        let err = build_character_catalog(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
    }
}
