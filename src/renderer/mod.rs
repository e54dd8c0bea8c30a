//! SVG renderer for composed room maps
//!
//! Takes rooms and their final grid positions and produces an SVG document with
//! prefixed CSS classes for styling.

pub mod config;
pub mod geometry;
pub mod svg;
pub mod text;

pub use config::{
    BackgroundFit, BackgroundImage, CrossGroupConnection, CustomLabel, DisplayOptions, FontStyle,
    Fonts, LineStyle, RenderConfig, RoomShape,
};
pub use geometry::{room_extent, Point, Viewport};
pub use svg::render_svg;
