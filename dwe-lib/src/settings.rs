//! Pipeline settings shared by every subcommand.
//!
//! Resolution chain, first hit wins:
//!
//! 1. `--config <path>` (must exist)
//! 2. `./dwe.toml`
//! 3. `<config dir>/dwe/settings.toml`
//! 4. built-in defaults
//!
//! A file that exists but does not parse is an error, never silently ignored.

use std::path::{Path, PathBuf};

use dwe_core::DEFAULT_CONTENT_PREFIX;
use serde::Deserialize;

use crate::error::PipelineError;

/// Settings file looked up in the working directory.
pub const LOCAL_SETTINGS_FILE: &str = "dwe.toml";

/// Canonical per-user settings file: `~/.config/dwe/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("dwe").join("settings.toml")
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Engine mount prefix stripped from icon object paths.
    pub content_prefix: String,
    pub placeholders: PlaceholderSettings,
    pub web_catalog: WebCatalogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_prefix: DEFAULT_CONTENT_PREFIX.to_string(),
            placeholders: PlaceholderSettings::default(),
            web_catalog: WebCatalogSettings::default(),
        }
    }
}

/// Placeholder icon locations.
///
/// `item` and `recipe` are ordinary paths (relative to the working
/// directory unless absolute); `spell` is relative to the content root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaceholderSettings {
    pub item: PathBuf,
    pub recipe: PathBuf,
    pub spell: PathBuf,
}

impl Default for PlaceholderSettings {
    fn default() -> Self {
        let placeholders = Path::new("docs").join("DWE").join("Assets").join("Placeholders");
        Self {
            item: placeholders.join("placeholder_icon.png"),
            recipe: placeholders.join("recipe_icon.png"),
            spell: PathBuf::from(
                "Art/UI/Skills/Icons/Unlock/Placeholder/T_Skill_Placeholder_Active_Spells.png",
            ),
        }
    }
}

impl PlaceholderSettings {
    pub fn spell_path(&self, content_root: &Path) -> PathBuf {
        content_root.join(&self.spell)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebCatalogSettings {
    pub tabs: Vec<TabSettings>,
}

impl Default for WebCatalogSettings {
    fn default() -> Self {
        let tab = |dir: &str, label: &str| TabSettings {
            dir: dir.to_string(),
            label: label.to_string(),
        };
        Self {
            tabs: vec![
                tab("BagTab", "Bag Items"),
                tab("RuneTab", "Rune Items"),
                tab("AmmoTab", "Ammo Items"),
                tab("QuestTab", "Quest Items"),
            ],
        }
    }
}

/// One asset-tree tab directory and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TabSettings {
    pub dir: String,
    pub label: String,
}

impl TabSettings {
    /// Catalog key: the directory name without `Tab`, lowercased.
    pub fn key(&self) -> String {
        self.dir.replace("Tab", "").to_lowercase()
    }
}

/// Pick the settings file to load, if any.
pub fn resolve_settings_path(cli_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = cli_override {
        return Some(p.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_SETTINGS_FILE);
    if local.is_file() {
        return Some(local);
    }
    let user = settings_path();
    user.is_file().then_some(user)
}

/// Load settings via the resolution chain.
pub fn load_settings(cli_override: Option<&Path>) -> Result<Settings, PipelineError> {
    let Some(path) = resolve_settings_path(cli_override) else {
        log::debug!("No settings file found, using defaults");
        return Ok(Settings::default());
    };
    let settings = load_settings_file(&path)?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Parse one settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings, PipelineError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::settings(path.display().to_string(), e.to_string()))?;
    parse_settings(&contents)
        .map_err(|message| PipelineError::settings(path.display().to_string(), message))
}

/// Parse settings from TOML text. Absent keys keep their defaults.
pub fn parse_settings(contents: &str) -> Result<Settings, String> {
    toml::from_str(contents).map_err(|e| e.message().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = parse_settings(
            r#"
content_prefix = "Game/Content/"

[placeholders]
spell = "Custom/Spell.png"
"#,
        )
        .unwrap();
        assert_eq!(settings.content_prefix, "Game/Content/");
        assert_eq!(settings.placeholders.spell, PathBuf::from("Custom/Spell.png"));
        assert_eq!(
            settings.placeholders.item,
            PlaceholderSettings::default().item
        );
        assert_eq!(settings.web_catalog.tabs.len(), 4);
    }

    #[test]
    fn test_custom_tabs() {
        let settings = parse_settings(
            r#"
[[web_catalog.tabs]]
dir = "ToolTab"
label = "Tools"
"#,
        )
        .unwrap();
        assert_eq!(settings.web_catalog.tabs.len(), 1);
        assert_eq!(settings.web_catalog.tabs[0].key(), "tool");
    }

    #[test]
    fn test_tab_keys() {
        let keys: Vec<String> = WebCatalogSettings::default()
            .tabs
            .iter()
            .map(TabSettings::key)
            .collect();
        assert_eq!(keys, ["bag", "rune", "ammo", "quest"]);
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(parse_settings("content_prefix = [").is_err());
    }

    #[test]
    fn test_missing_override_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = load_settings(Some(&tmp.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, PipelineError::Settings { .. }));
    }
}
