//! Core types for the grid layout

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::room::RoomId;

/// An integer grid cell; adjacent connected rooms are one unit apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for GridPos {
    fn add_assign(&mut self, rhs: GridPos) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Inclusive bounding box over grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl GridBounds {
    /// Bounds of a set of positions, `None` when empty
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a GridPos>) -> Option<Self> {
        positions.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => GridBounds {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => b.expand_to_include(*p),
            })
        })
    }

    pub fn expand_to_include(&self, p: GridPos) -> Self {
        GridBounds {
            min_x: self.min_x.min(p.x),
            min_y: self.min_y.min(p.y),
            max_x: self.max_x.max(p.x),
            max_y: self.max_y.max(p.y),
        }
    }

    pub fn translate(&self, by: GridPos) -> Self {
        GridBounds {
            min_x: self.min_x + by.x,
            min_y: self.min_y + by.y,
            max_x: self.max_x + by.x,
            max_y: self.max_y + by.y,
        }
    }

    /// Number of grid steps spanned horizontally
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    pub fn center_x(&self) -> f64 {
        (self.min_x + self.max_x) as f64 / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.min_y + self.max_y) as f64 / 2.0
    }
}

/// A connected component laid out in its own relative frame
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Discovery order, also the key for manual overrides
    pub index: usize,
    /// Member rooms in placement order
    pub rooms: Vec<RoomId>,
    /// Relative positions; the start room sits at the origin
    pub positions: IndexMap<RoomId, GridPos>,
    pub bounds: GridBounds,
    /// Automatic translation relative to the other groups, filled in once
    pub base_offset: Option<GridPos>,
    /// User-assigned display name
    pub name: Option<String>,
}

impl Group {
    pub fn new(index: usize, positions: IndexMap<RoomId, GridPos>) -> Self {
        let bounds = GridBounds::from_positions(positions.values()).unwrap_or(GridBounds {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
        });
        Self {
            index,
            rooms: positions.keys().copied().collect(),
            positions,
            bounds,
            base_offset: None,
            name: None,
        }
    }

    pub fn position(&self, room: RoomId) -> Option<GridPos> {
        self.positions.get(&room).copied()
    }

    /// Name shown on the map, "Group N" (1-based) when none was assigned
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| default_group_name(self.index))
    }
}

pub fn default_group_name(index: usize) -> String {
    format!("Group {}", index + 1)
}

/// User-chosen adjustments for one group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupOverride {
    pub name: Option<String>,
    pub offset: GridPos,
    pub label_offset: GridPos,
}

/// Manual adjustments keyed by group index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupOverrides {
    pub groups: BTreeMap<usize, GroupOverride>,
}

impl GroupOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&GroupOverride> {
        self.groups.get(&index)
    }

    pub fn offset(&self, index: usize) -> GridPos {
        self.get(index).map(|o| o.offset).unwrap_or_default()
    }

    pub fn label_offset(&self, index: usize) -> GridPos {
        self.get(index).map(|o| o.label_offset).unwrap_or_default()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|o| o.name.as_deref())
    }

    pub fn with_offset(mut self, index: usize, offset: impl Into<GridPos>) -> Self {
        self.groups.entry(index).or_default().offset = offset.into();
        self
    }

    pub fn with_label_offset(mut self, index: usize, offset: impl Into<GridPos>) -> Self {
        self.groups.entry(index).or_default().label_offset = offset.into();
        self
    }

    pub fn with_name(mut self, index: usize, name: impl Into<String>) -> Self {
        self.groups.entry(index).or_default().name = Some(name.into());
        self
    }
}

/// Where a group label sits relative to its group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    /// Centered above the group
    Above,
    /// Right-aligned against the group's left edge
    Left,
}

/// A group label anchor in (fractional) grid units
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLabel {
    pub index: usize,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub placement: LabelPlacement,
}

/// Final, composed positions ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct FinalLayout {
    /// Room -> final grid position, in group order
    pub positions: IndexMap<RoomId, GridPos>,
    pub labels: Vec<GroupLabel>,
}

impl FinalLayout {
    pub fn position(&self, room: RoomId) -> Option<GridPos> {
        self.positions.get(&room).copied()
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        GridBounds::from_positions(self.positions.values())
    }

    pub fn is_occupied(&self, cell: GridPos) -> bool {
        self.positions.values().any(|p| *p == cell)
    }
}
