//! Configuration for map rendering

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConnectionError, LoadError};
use crate::room::{Room, RoomId};
use crate::theme::{Palette, Theme};

/// Shape drawn for each room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomShape {
    Circle,
    #[default]
    Square,
    /// 1.5 times wider than tall
    Rectangle,
}

/// Font settings for one kind of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    pub size: f64,
    pub color: String,
    pub family: String,
    pub bold: bool,
}

impl FontStyle {
    pub fn new(size: f64, color: impl Into<String>) -> Self {
        Self {
            size,
            color: color.into(),
            family: "Arial".to_string(),
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::new(10.0, "#000000")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fonts {
    /// Connection labels
    pub labels: FontStyle,
    /// Room ids and names
    pub rooms: FontStyle,
    /// Group labels
    pub groups: FontStyle,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            labels: FontStyle::new(8.0, "#444444"),
            rooms: FontStyle::new(10.0, "#000000"),
            groups: FontStyle::new(14.0, "#333333").bold(),
        }
    }
}

/// What gets drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub show_room_ids: bool,
    pub show_room_names: bool,
    pub show_labels: bool,
    pub show_connections: bool,
    pub show_group_labels: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_room_ids: true,
            show_room_names: false,
            show_labels: true,
            show_connections: true,
            show_group_labels: true,
        }
    }
}

/// How a background image covers the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundFit {
    #[default]
    Stretch,
    Tile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    /// URL or data URI
    pub href: String,
    #[serde(default)]
    pub fit: BackgroundFit,
    /// Tile size in pixels, defaults to one grid unit square
    #[serde(default)]
    pub tile_size: Option<(f64, f64)>,
}

/// Stroke pattern for cross-group connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Dashed,
    Dotted,
    Solid,
}

/// A manually drawn connection between rooms, usually in different groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossGroupConnection {
    pub from_id: RoomId,
    pub to_id: RoomId,
    #[serde(default)]
    pub style: LineStyle,
    #[serde(default = "default_dash_spacing")]
    pub dash_spacing: String,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_dash_spacing() -> String {
    "5,5".to_string()
}

impl CrossGroupConnection {
    pub fn new(from_id: RoomId, to_id: RoomId) -> Self {
        Self {
            from_id,
            to_id,
            style: LineStyle::Dashed,
            dash_spacing: default_dash_spacing(),
            color: None,
        }
    }

    /// SVG dash pattern, `None` for solid lines
    pub fn dasharray(&self) -> Option<&str> {
        match self.style {
            LineStyle::Dashed => Some(self.dash_spacing.as_str()),
            LineStyle::Dotted => Some("2,3"),
            LineStyle::Solid => None,
        }
    }

    /// Whether this connects the same unordered pair as `other`
    pub fn same_pair(&self, a: RoomId, b: RoomId) -> bool {
        (self.from_id == a && self.to_id == b) || (self.from_id == b && self.to_id == a)
    }
}

/// Free-floating text placed in document pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_color: String,
    pub font_family: String,
    pub bold: bool,
    pub background: bool,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
}

impl Default for CustomLabel {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            text: String::new(),
            x: 50.0,
            y: 50.0,
            font_size: 12.0,
            font_color: "#000000".to_string(),
            font_family: "Arial".to_string(),
            bold: false,
            background: true,
            background_color: palette.background,
            border_color: palette.connections,
            border_width: 1.0,
        }
    }
}

impl CustomLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// Everything the renderer needs besides rooms and positions
///
/// Passed by reference into each render; never stored between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixels per grid unit
    pub edge_length: f64,
    pub room_shape: RoomShape,
    /// Half the room's height in pixels (radius for circles)
    pub room_size: f64,
    pub stroke_width: f64,
    pub connection_width: f64,
    pub colors: Palette,
    /// Tag -> fill color; a room uses the first of its own tags found here
    pub tag_colors: IndexMap<String, String>,
    pub fonts: Fonts,
    pub display: DisplayOptions,
    pub background_image: Option<BackgroundImage>,
    pub cross_group_connections: Vec<CrossGroupConnection>,
    /// Stroke for cross-group lines without their own color (connection color if unset)
    pub cross_group_color: Option<String>,
    /// Dash pattern for automatic cross-group lines; empty draws them solid
    pub cross_group_dash: String,
    pub custom_labels: Vec<CustomLabel>,
    /// Characters per line when wrapping room names
    pub name_wrap_width: usize,
    /// Whether to format output with indentation
    pub pretty_print: bool,
    /// Whether to include the XML declaration
    pub standalone: bool,
    /// Prefix for CSS class names (e.g., "map-" for "map-room")
    pub class_prefix: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            edge_length: 80.0,
            room_shape: RoomShape::Square,
            room_size: 15.0,
            stroke_width: 1.0,
            connection_width: 2.0,
            colors: Palette::default(),
            tag_colors: IndexMap::new(),
            fonts: Fonts::default(),
            display: DisplayOptions::default(),
            background_image: None,
            cross_group_connections: vec![],
            cross_group_color: None,
            cross_group_dash: "5,5".to_string(),
            custom_labels: vec![],
            name_wrap_width: 12,
            pretty_print: true,
            standalone: true,
            class_prefix: Some("map-".to_string()),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from TOML; missing fields take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject non-positive sizes and lengths
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("edge_length", self.edge_length)?;
        ConfigError::check_positive("room_size", self.room_size)?;
        ConfigError::check_positive("stroke_width", self.stroke_width)?;
        ConfigError::check_positive("connection_width", self.connection_width)?;
        ConfigError::check_positive("fonts.labels.size", self.fonts.labels.size)?;
        ConfigError::check_positive("fonts.rooms.size", self.fonts.rooms.size)?;
        ConfigError::check_positive("fonts.groups.size", self.fonts.groups.size)?;
        for label in &self.custom_labels {
            ConfigError::check_positive("custom_labels.font_size", label.font_size)?;
        }
        if self.name_wrap_width == 0 {
            return Err(ConfigError::NonPositive {
                field: "name_wrap_width",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Fill color for a room: first of its tags with a color, else the default
    pub fn room_fill(&self, room: &Room) -> &str {
        room.tags
            .iter()
            .find_map(|tag| self.tag_colors.get(tag))
            .map(String::as_str)
            .unwrap_or(&self.colors.default)
    }

    pub fn cross_group_color(&self) -> &str {
        self.cross_group_color
            .as_deref()
            .unwrap_or(&self.colors.connections)
    }

    /// Replace the palette and tag colors with a theme's
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.colors = theme.colors.clone();
        self.tag_colors = theme.tags.clone();
        self
    }

    pub fn with_edge_length(mut self, edge_length: f64) -> Self {
        self.edge_length = edge_length;
        self
    }

    pub fn with_room_shape(mut self, shape: RoomShape) -> Self {
        self.room_shape = shape;
        self
    }

    pub fn with_room_size(mut self, size: f64) -> Self {
        self.room_size = size;
        self
    }

    pub fn with_tag_color(mut self, tag: impl Into<String>, color: impl Into<String>) -> Self {
        self.tag_colors.insert(tag.into(), color.into());
        self
    }

    pub fn with_background_image(mut self, image: BackgroundImage) -> Self {
        self.background_image = Some(image);
        self
    }

    pub fn with_custom_label(mut self, label: CustomLabel) -> Self {
        self.custom_labels.push(label);
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Add a dashed connection between two rooms
    ///
    /// Rejects self-connections and pairs already present in either orientation.
    pub fn add_cross_group_connection(
        &mut self,
        connection: CrossGroupConnection,
    ) -> Result<(), ConnectionError> {
        let (a, b) = (connection.from_id, connection.to_id);
        if a == b {
            return Err(ConnectionError::SelfConnection(a));
        }
        if self
            .cross_group_connections
            .iter()
            .any(|c| c.same_pair(a, b))
        {
            return Err(ConnectionError::Duplicate(a, b));
        }
        self.cross_group_connections.push(connection);
        Ok(())
    }

    pub(crate) fn prefix(&self) -> &str {
        self.class_prefix.as_deref().unwrap_or_default()
    }
}
