//! Color themes
//!
//! A theme bundles the base palette with an ordered tag -> color table. Themes are TOML
//! documents; the built-in presets are stored as TOML constants and parsed on demand.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, LoadError};

/// Base colors used when drawing a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Room fill when no tag color matches
    pub default: String,
    pub background: String,
    pub connections: String,
    pub vertical_connections: String,
    pub room_stroke: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default: "#ffffff".to_string(),
            background: "#f8f9fa".to_string(),
            connections: "#666666".to_string(),
            vertical_connections: "#999999".to_string(),
            room_stroke: "#333333".to_string(),
        }
    }
}

/// A named palette with tag colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: Option<String>,
    pub description: Option<String>,
    pub colors: Palette,
    /// Tag -> fill color, in declaration order
    pub tags: IndexMap<String, String>,
}

/// TOML structure for deserializing themes
#[derive(Deserialize)]
struct TomlTheme {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: Palette,
    #[serde(default)]
    tags: IndexMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

const DEFAULT_THEME: &str = r##"
[metadata]
name = "default"

[colors]
default = "#ffffff"
background = "#f8f9fa"
connections = "#666666"
vertical_connections = "#999999"
room_stroke = "#333333"
"##;

const MARITIME_THEME: &str = r##"
[metadata]
name = "maritime"
description = "Sea blues with sandy beaches"

[colors]
default = "#f0f8ff"
background = "#e6f3ff"
connections = "#4682b4"
vertical_connections = "#6495ed"

[tags]
exit = "#ff6b6b"
sea = "#1e90ff"
beach = "#f4a460"
shop = "#90EE90"
bank = "#ffd700"
"##;

const DUNGEON_THEME: &str = r##"
[metadata]
name = "dungeon"
description = "Dark stone with warning colors"

[colors]
default = "#2c2c2c"
background = "#1a1a1a"
connections = "#666666"
vertical_connections = "#888888"
room_stroke = "#999999"

[tags]
exit = "#dc2626"
shop = "#16a34a"
danger = "#ef4444"
treasure = "#eab308"
"##;

const FOREST_THEME: &str = r##"
[metadata]
name = "forest"
description = "Greens and water blues"

[colors]
default = "#f0f8e8"
background = "#e8f5e8"
connections = "#228b22"
vertical_connections = "#32cd32"

[tags]
exit = "#e74c3c"
water = "#4a90e2"
shop = "#27ae60"
tree = "#2d5016"
"##;

const HIGH_CONTRAST_THEME: &str = r##"
[metadata]
name = "high-contrast"

[colors]
default = "#ffffff"
background = "#000000"
connections = "#ffffff"
vertical_connections = "#cccccc"
room_stroke = "#ffffff"

[tags]
exit = "#ff0000"
shop = "#00ff00"
water = "#0000ff"
danger = "#ff00ff"
"##;

/// Built-in preset names
pub const PRESETS: [&str; 5] = ["default", "maritime", "dungeon", "forest", "high-contrast"];

impl Theme {
    /// Load a theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a theme from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let parsed: TomlTheme = toml::from_str(content)?;

        Ok(Theme {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
            tags: parsed.tags,
        })
    }

    /// A built-in theme by name
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let source = match name.trim().to_ascii_lowercase().as_str() {
            "default" => DEFAULT_THEME,
            "maritime" => MARITIME_THEME,
            "dungeon" => DUNGEON_THEME,
            "forest" => FOREST_THEME,
            "high-contrast" => HIGH_CONTRAST_THEME,
            _ => return Err(ConfigError::UnknownTheme(name.to_string())),
        };
        Ok(Self::from_toml_str(source).expect("built-in themes should be valid TOML"))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_THEME).expect("default theme should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_matches_palette() {
        let theme = Theme::default();
        assert_eq!(theme.colors, Palette::default());
        assert!(theme.tags.is_empty());
    }

    #[test]
    fn test_all_presets_parse() {
        for name in PRESETS {
            let theme = Theme::preset(name).unwrap();
            assert_eq!(theme.name.as_deref(), Some(name));
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert_eq!(
            Theme::preset("neon"),
            Err(ConfigError::UnknownTheme("neon".to_string()))
        );
    }

    #[test]
    fn test_missing_colors_fall_back() {
        let theme = Theme::preset("maritime").unwrap();
        assert_eq!(theme.colors.default, "#f0f8ff");
        assert_eq!(theme.colors.room_stroke, "#333333");
    }

    #[test]
    fn test_tag_order_preserved() {
        let theme = Theme::preset("dungeon").unwrap();
        let names: Vec<&str> = theme.tags.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["exit", "shop", "danger", "treasure"]);
    }

    #[test]
    fn test_parse_custom_theme() {
        let toml_str = r##"
[metadata]
name = "Test Theme"

[colors]
background = "#000000"
vertical_connections = "#445566"

[tags]
bank = "#ffd700"
"##;
        let theme = Theme::from_toml_str(toml_str).expect("Should parse");
        assert_eq!(theme.name, Some("Test Theme".to_string()));
        assert_eq!(theme.colors.background, "#000000");
        assert_eq!(theme.colors.connections, "#666666");
        assert_eq!(theme.colors.vertical_connections, "#445566");
        assert_eq!(theme.tags.get("bank").map(String::as_str), Some("#ffd700"));
    }

    #[test]
    fn test_invalid_toml_error() {
        let invalid = "this is not valid toml {{{{";
        assert!(Theme::from_toml_str(invalid).is_err());
    }
}
