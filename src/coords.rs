//! Coordinate files and image-map export
//!
//! A coordinate file records everything a user adjusted by hand (group offsets, names,
//! label offsets, cross-group connections, custom labels) so a map can be regenerated
//! identically later.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::layout::{default_group_name, FinalLayout, GridPos, Group, GroupOverrides};
use crate::renderer::{
    room_extent, CrossGroupConnection, CustomLabel, Fonts, RenderConfig, RoomShape, Viewport,
};
use crate::room::{index_by_id, Room, RoomId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateFile {
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub map_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub cross_group_connections: Vec<CrossGroupConnection>,
    #[serde(default)]
    pub custom_labels: Vec<CustomLabel>,
    /// Rendering settings at export time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ExportedConfig>,
}

/// The rendering settings a coordinate file carries
///
/// Every field is optional on import; absent fields leave the target config alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_shape: Option<RoomShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ExportedColors>,
    /// `[tag, color]` pairs in priority order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_colors: Option<Vec<(String, String)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Fonts>,
}

/// Palette entries; missing ones keep the current color on import
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportedColors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_connections: Option<String>,
}

impl ExportedConfig {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            edge_length: Some(config.edge_length),
            room_shape: Some(config.room_shape),
            room_size: Some(config.room_size),
            stroke_width: Some(config.stroke_width),
            connection_width: Some(config.connection_width),
            colors: Some(ExportedColors {
                default: Some(config.colors.default.clone()),
                background: Some(config.colors.background.clone()),
                connections: Some(config.colors.connections.clone()),
                vertical_connections: Some(config.colors.vertical_connections.clone()),
            }),
            tag_colors: Some(
                config
                    .tag_colors
                    .iter()
                    .map(|(tag, color)| (tag.clone(), color.clone()))
                    .collect(),
            ),
            fonts: Some(config.fonts.clone()),
        }
    }

    /// Overwrite the settings present here; colors merge over the current palette
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(edge_length) = self.edge_length {
            config.edge_length = edge_length;
        }
        if let Some(shape) = self.room_shape {
            config.room_shape = shape;
        }
        if let Some(size) = self.room_size {
            config.room_size = size;
        }
        if let Some(width) = self.stroke_width {
            config.stroke_width = width;
        }
        if let Some(width) = self.connection_width {
            config.connection_width = width;
        }
        if let Some(colors) = &self.colors {
            let palette = &mut config.colors;
            for (slot, value) in [
                (&mut palette.default, &colors.default),
                (&mut palette.background, &colors.background),
                (&mut palette.connections, &colors.connections),
                (&mut palette.vertical_connections, &colors.vertical_connections),
            ] {
                if let Some(value) = value {
                    slot.clone_from(value);
                }
            }
        }
        if let Some(tag_colors) = &self.tag_colors {
            config.tag_colors = tag_colors.iter().cloned().collect();
        }
        if let Some(fonts) = &self.fonts {
            config.fonts = fonts.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub index: usize,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub offset: GridPos,
    #[serde(default)]
    pub label_offset: GridPos,
    #[serde(default)]
    pub rooms: Vec<RoomRecord>,
}

/// A room's position relative to its group's start room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: RoomId,
    pub position: GridPos,
}

impl CoordinateFile {
    /// Snapshot the current groups and manual adjustments
    pub fn from_groups(
        map_name: impl Into<String>,
        map_id: impl Into<String>,
        groups: &[Group],
        overrides: &GroupOverrides,
        config: &RenderConfig,
    ) -> Self {
        let groups = groups
            .iter()
            .map(|group| GroupRecord {
                index: group.index,
                name: Some(
                    overrides
                        .name(group.index)
                        .map(str::to_string)
                        .unwrap_or_else(|| group.display_name()),
                ),
                offset: overrides.offset(group.index),
                label_offset: overrides.label_offset(group.index),
                rooms: group
                    .positions
                    .iter()
                    .map(|(id, position)| RoomRecord {
                        id: *id,
                        position: *position,
                    })
                    .collect(),
            })
            .collect();

        Self {
            map_name: map_name.into(),
            map_id: map_id.into(),
            version: None,
            groups,
            cross_group_connections: config.cross_group_connections.clone(),
            custom_labels: config.custom_labels.clone(),
            config: Some(ExportedConfig::from_config(config)),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Parse a coordinate file, rejecting documents without a `groups` array
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.get("groups").is_some_and(serde_json::Value::is_array) {
            return Err(LoadError::InvalidCoordinates(
                "expected a 'groups' array".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Manual group adjustments recorded in this file
    ///
    /// Groups without a name get "Group N".
    pub fn to_overrides(&self) -> GroupOverrides {
        self.groups
            .iter()
            .fold(GroupOverrides::new(), |overrides, group| {
                let name = group
                    .name
                    .clone()
                    .unwrap_or_else(|| default_group_name(group.index));
                overrides
                    .with_name(group.index, name)
                    .with_offset(group.index, group.offset)
                    .with_label_offset(group.index, group.label_offset)
            })
    }

    /// Copy the recorded cross-group connections and custom labels into `config`
    pub fn apply_annotations(&self, config: &mut RenderConfig) {
        config.cross_group_connections = self.cross_group_connections.clone();
        config.custom_labels = self.custom_labels.clone();
    }

    /// Restore the recorded rendering settings into `config`, if the file has any
    pub fn apply_config(&self, config: &mut RenderConfig) {
        if let Some(exported) = &self.config {
            exported.apply(config);
            tracing::debug!("applied rendering settings from coordinate file");
        }
    }
}

/// A room's bounding box in the rendered image, as used by image-map databases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCoordinates {
    pub id: RoomId,
    pub image: String,
    /// left, top, right, bottom in pixels
    pub image_coords: [i64; 4],
}

/// Pixel bounding boxes of every positioned room, in room order
pub fn image_coordinates(
    rooms: &[Room],
    layout: &FinalLayout,
    config: &RenderConfig,
    image: &str,
) -> Vec<ImageCoordinates> {
    let Some(bounds) = layout.bounds() else {
        return vec![];
    };
    let viewport = Viewport::new(bounds, config.edge_length);
    let (hw, hh) = room_extent(config.room_shape, config.room_size);

    index_by_id(rooms)
        .into_values()
        .filter_map(|room| {
            let center = viewport.to_pixels(layout.position(room.id)?);
            Some(ImageCoordinates {
                id: room.id,
                image: image.to_string(),
                image_coords: [
                    (center.x - hw).round() as i64,
                    (center.y - hh).round() as i64,
                    (center.x + hw).round() as i64,
                    (center.y + hh).round() as i64,
                ],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute;
    use pretty_assertions::assert_eq;

    fn two_groups() -> (Vec<Room>, Vec<Group>, FinalLayout) {
        let rooms = vec![
            Room::new(1).with_exit(2, "east"),
            Room::new(2).with_exit(1, "west"),
            Room::new(3),
        ];
        let (groups, layout) = compute(&rooms, &GroupOverrides::new()).unwrap();
        (rooms, groups, layout)
    }

    #[test]
    fn test_round_trip_overrides() {
        let (_, groups, _) = two_groups();
        let overrides = GroupOverrides::new()
            .with_offset(1, (2, -1))
            .with_label_offset(1, (0, 1))
            .with_name(0, "Docks");
        let mut config = RenderConfig::default();
        config
            .add_cross_group_connection(CrossGroupConnection::new(2, 3))
            .unwrap();

        let file = CoordinateFile::from_groups("harbor", "id_1-3", &groups, &overrides, &config);
        let json = file.to_json().unwrap();
        let back = CoordinateFile::from_json(&json).unwrap();
        assert_eq!(back, file);

        let restored = back.to_overrides();
        assert_eq!(restored.offset(1), GridPos::new(2, -1));
        assert_eq!(restored.label_offset(1), GridPos::new(0, 1));
        assert_eq!(restored.name(0), Some("Docks"));
        assert_eq!(restored.name(1), Some("Group 2"));

        let mut fresh = RenderConfig::default();
        back.apply_annotations(&mut fresh);
        assert_eq!(fresh.cross_group_connections.len(), 1);
    }

    #[test]
    fn test_exported_shape() {
        let (_, groups, _) = two_groups();
        let file = CoordinateFile::from_groups(
            "harbor",
            "id_1-3",
            &groups,
            &GroupOverrides::new(),
            &RenderConfig::default(),
        );
        let value: serde_json::Value = serde_json::from_str(&file.to_json().unwrap()).unwrap();
        assert_eq!(value["mapId"], "id_1-3");
        assert_eq!(value["groups"][0]["labelOffset"]["x"], 0);
        assert_eq!(value["groups"][0]["rooms"][1]["position"]["x"], 1);
        assert_eq!(value["groups"][1]["name"], "Group 2");
    }

    #[test]
    fn test_exported_config_shape() {
        let (_, groups, _) = two_groups();
        let config = RenderConfig::default()
            .with_edge_length(60.0)
            .with_tag_color("shop", "#00ff00")
            .with_tag_color("bank", "#ffd700");
        let file = CoordinateFile::from_groups("harbor", "all", &groups, &GroupOverrides::new(), &config);
        let value: serde_json::Value = serde_json::from_str(&file.to_json().unwrap()).unwrap();
        assert_eq!(value["config"]["edgeLength"], 60.0);
        assert_eq!(value["config"]["roomShape"], "square");
        assert_eq!(value["config"]["colors"]["verticalConnections"], "#999999");
        assert_eq!(value["config"]["tagColors"][0][0], "shop");
        assert_eq!(value["config"]["tagColors"][1][1], "#ffd700");
        assert_eq!(value["config"]["fonts"]["labels"]["size"], 8.0);
        assert!(value["config"].get("display").is_none());
    }

    #[test]
    fn test_apply_config_restores_settings() {
        let json = r##"{
            "groups": [],
            "config": {
                "edgeLength": 50,
                "roomShape": "circle",
                "colors": {"connections": "#112233"},
                "tagColors": [["exit", "#ff0000"], ["shop", "#00ff00"]]
            }
        }"##;
        let file = CoordinateFile::from_json(json).unwrap();
        let mut config = RenderConfig::default().with_tag_color("bank", "#ffd700");
        file.apply_config(&mut config);

        assert_eq!(config.edge_length, 50.0);
        assert_eq!(config.room_shape, RoomShape::Circle);
        assert_eq!(config.room_size, 15.0);
        assert_eq!(config.colors.connections, "#112233");
        assert_eq!(config.colors.background, "#f8f9fa");
        let tags: Vec<&str> = config.tag_colors.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["exit", "shop"]);
    }

    #[test]
    fn test_apply_config_without_config_is_noop() {
        let file = CoordinateFile::from_json(r#"{"groups": []}"#).unwrap();
        let mut config = RenderConfig::default();
        file.apply_config(&mut config);
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_image_coordinates_skip_duplicate_ids() {
        let rooms = vec![Room::new(1), Room::new(1).with_exit(2, "east"), Room::new(2)];
        let (_, layout) = compute(&rooms, &GroupOverrides::new()).unwrap();
        let coords = image_coordinates(&rooms, &layout, &RenderConfig::default(), "map.png");
        let ids: Vec<RoomId> = coords.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_import_defaults() {
        let file = CoordinateFile::from_json(r#"{"groups": [{"index": 2}]}"#).unwrap();
        let overrides = file.to_overrides();
        assert_eq!(overrides.name(2), Some("Group 3"));
        assert_eq!(overrides.offset(2), GridPos::ORIGIN);
        assert!(file.custom_labels.is_empty());
    }

    #[test]
    fn test_import_requires_groups() {
        assert!(matches!(
            CoordinateFile::from_json(r#"{"mapName": "x"}"#),
            Err(LoadError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            CoordinateFile::from_json(r#"{"groups": {}}"#),
            Err(LoadError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            CoordinateFile::from_json("not json"),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_image_coordinates_square() {
        let rooms = vec![Room::new(1)];
        let (_, layout) = compute(&rooms, &GroupOverrides::new()).unwrap();
        let coords = image_coordinates(&rooms, &layout, &RenderConfig::default(), "map.png");
        insta::assert_snapshot!(
            serde_json::to_string(&coords).unwrap(),
            @r#"[{"id":1,"image":"map.png","image_coords":[145,145,175,175]}]"#
        );
    }

    #[test]
    fn test_image_coordinates_rectangle() {
        let (rooms, _, layout) = two_groups();
        let config = RenderConfig::default()
            .with_room_shape(RoomShape::Rectangle)
            .with_room_size(10.0);
        let coords = image_coordinates(&rooms, &layout, &config, "map.png");
        assert_eq!(coords.len(), 3);
        // Room 2 sits at grid (1, 0): pixel center (240, 160).
        assert_eq!(coords[1].image_coords, [225, 150, 255, 170]);
    }
}
