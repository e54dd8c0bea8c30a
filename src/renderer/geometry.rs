//! Grid to pixel mapping

use crate::layout::{GridBounds, GridPos};

use super::config::RoomShape;

/// Empty grid units kept around the drawing on every side
pub const PADDING_UNITS: i32 = 2;

/// A point in document pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Maps grid coordinates into a padded pixel document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    origin_x: i32,
    origin_y: i32,
    edge_length: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Document covering `bounds` plus [`PADDING_UNITS`] on each side
    pub fn new(bounds: GridBounds, edge_length: f64) -> Self {
        let units_w = bounds.width() + 2 * PADDING_UNITS;
        let units_h = bounds.height() + 2 * PADDING_UNITS;
        Self {
            origin_x: bounds.min_x - PADDING_UNITS,
            origin_y: bounds.min_y - PADDING_UNITS,
            edge_length,
            width: units_w as f64 * edge_length,
            height: units_h as f64 * edge_length,
        }
    }

    /// Pixel center of a grid cell
    pub fn to_pixels(&self, pos: GridPos) -> Point {
        self.point(pos.x as f64, pos.y as f64)
    }

    /// Pixel location of a fractional grid coordinate
    pub fn point(&self, x: f64, y: f64) -> Point {
        Point::new(
            (x - self.origin_x as f64) * self.edge_length,
            (y - self.origin_y as f64) * self.edge_length,
        )
    }
}

/// Half width and half height of a room shape in pixels
pub fn room_extent(shape: RoomShape, size: f64) -> (f64, f64) {
    match shape {
        RoomShape::Circle | RoomShape::Square => (size, size),
        RoomShape::Rectangle => (size * 1.5, size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_padding() {
        let bounds = GridBounds {
            min_x: 0,
            min_y: 0,
            max_x: 3,
            max_y: 1,
        };
        let viewport = Viewport::new(bounds, 10.0);
        assert_eq!(viewport.width, 70.0);
        assert_eq!(viewport.height, 50.0);
        assert_eq!(viewport.to_pixels(GridPos::new(0, 0)), Point::new(20.0, 20.0));
        assert_eq!(viewport.to_pixels(GridPos::new(3, 1)), Point::new(50.0, 30.0));
    }

    #[test]
    fn test_viewport_negative_bounds() {
        let bounds = GridBounds {
            min_x: -2,
            min_y: -1,
            max_x: 0,
            max_y: 0,
        };
        let viewport = Viewport::new(bounds, 80.0);
        assert_eq!(viewport.to_pixels(GridPos::new(-2, -1)), Point::new(160.0, 160.0));
    }

    #[test]
    fn test_room_extent() {
        assert_eq!(room_extent(RoomShape::Square, 15.0), (15.0, 15.0));
        assert_eq!(room_extent(RoomShape::Rectangle, 10.0), (15.0, 10.0));
    }
}
