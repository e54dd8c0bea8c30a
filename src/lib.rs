//! Room Mapper - turn a graph of rooms into a grid-aligned SVG map
//!
//! This library provides direction resolution, a grid layout engine, and an SVG
//! renderer for room databases exported from text-world map tools.
//!
//! # Example
//!
//! ```rust
//! use room_mapper::{generate_map, GroupOverrides, RenderConfig, Room};
//!
//! let rooms = vec![
//!     Room::new(1).with_exit(2, "north"),
//!     Room::new(2).with_exit(1, "south"),
//! ];
//! let map = generate_map(&rooms, &RenderConfig::default(), &GroupOverrides::new()).unwrap();
//! assert!(map.svg.contains("<svg"));
//! assert_eq!(map.groups.len(), 1);
//! ```

pub mod coords;
pub mod direction;
pub mod error;
pub mod label;
pub mod layout;
pub mod renderer;
pub mod room;
pub mod selection;
pub mod theme;

pub use coords::{image_coordinates, CoordinateFile, ExportedConfig, ImageCoordinates};
pub use direction::{resolve, resolve_pair, Direction, Resolution};
pub use error::{ConfigError, ConnectionError, LoadError};
pub use label::extract_label;
pub use layout::{FinalLayout, GridPos, Group, GroupOverrides, LayoutError};
pub use renderer::{render_svg, RenderConfig};
pub use room::{load_rooms, parse_rooms, Room, RoomId};
pub use theme::Theme;

use thiserror::Error;

/// Errors that can occur while generating a map
#[derive(Debug, Error)]
pub enum MapError {
    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Invalid rendering configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Everything produced by one map generation
#[derive(Debug, Clone)]
pub struct MapOutput {
    pub svg: String,
    /// Groups with their relative positions and base offsets
    pub groups: Vec<Group>,
    pub layout: FinalLayout,
}

/// Lay out and render a set of rooms
///
/// The configuration is validated before any layout work. Rooms referenced by exits
/// but absent from `rooms` are ignored.
///
/// # Example
///
/// ```rust
/// use room_mapper::{generate_map, GroupOverrides, RenderConfig, Room};
///
/// let rooms = vec![Room::new(1), Room::new(2)];
/// let overrides = GroupOverrides::new().with_offset(1, (0, 2));
/// let map = generate_map(&rooms, &RenderConfig::default(), &overrides).unwrap();
///
/// assert_eq!(map.layout.position(2).map(|p| (p.x, p.y)), Some((3, 2)));
/// ```
pub fn generate_map(
    rooms: &[Room],
    config: &RenderConfig,
    overrides: &GroupOverrides,
) -> Result<MapOutput, MapError> {
    config.validate()?;

    let (groups, layout) = layout::compute(rooms, overrides)?;
    for group in &groups {
        tracing::debug!(
            group = group.index,
            name = %group.display_name(),
            rooms = group.rooms.len(),
            offset = ?group.base_offset,
            "group placed"
        );
    }

    let svg = render_svg(rooms, &layout, config)?;
    Ok(MapOutput {
        svg,
        groups,
        layout,
    })
}
