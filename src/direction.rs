//! Direction resolution for room connections
//!
//! Decides whether a `wayto` edge is a spatial connection that participates in grid
//! layout, a cross-group reference drawn separately, or neither. Resolution is a pure
//! function of the source room and target id, so layout and rendering always agree.

use std::fmt;
use std::str::FromStr;

use crate::room::{Room, RoomId};

/// Prefix marking a movement command as a raw script rather than a typed direction
pub const SCRIPT_MARKER: &str = ";e";

/// `dirto` sentinel excluding an edge from layout and drawing it as a dashed overlay
pub const CROSS_GROUP_SENTINEL: &str = "cross-group";

/// Compass and vertical directions a connection can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
    Up,
    Down,
    Out,
}

impl Direction {
    /// All directions in substring-matching order
    ///
    /// Diagonals come first so that "go northeast" is never read as "north".
    pub const ALL: [Direction; 11] = [
        Direction::Northeast,
        Direction::Northwest,
        Direction::Southeast,
        Direction::Southwest,
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::Out,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::Northeast => "northeast",
            Direction::East => "east",
            Direction::Southeast => "southeast",
            Direction::South => "south",
            Direction::Southwest => "southwest",
            Direction::West => "west",
            Direction::Northwest => "northwest",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Out => "out",
        }
    }

    fn abbreviation(self) -> Option<&'static str> {
        match self {
            Direction::North => Some("n"),
            Direction::Northeast => Some("ne"),
            Direction::East => Some("e"),
            Direction::Southeast => Some("se"),
            Direction::South => Some("s"),
            Direction::Southwest => Some("sw"),
            Direction::West => Some("w"),
            Direction::Northwest => Some("nw"),
            Direction::Up => Some("u"),
            Direction::Down => Some("d"),
            Direction::Out => None,
        }
    }

    /// Grid step for one unit of travel in this direction (y grows downward)
    pub fn unit_offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::Northeast => (1, -1),
            Direction::East => (1, 0),
            Direction::Southeast => (1, 1),
            Direction::South => (0, 1),
            Direction::Southwest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::Northwest => (-1, -1),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Out => (1, 0),
        }
    }

    /// Up and down are drawn with the vertical connection color
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Exact match, case-insensitive and trimmed, including short forms
    pub fn parse(text: &str) -> Option<Direction> {
        let text = text.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == text || d.abbreviation() == Some(text.as_str()))
    }

    /// First direction (in [`Direction::ALL`] order) whose name occurs in the text
    pub fn find_in(text: &str) -> Option<Direction> {
        let text = text.to_ascii_lowercase();
        Self::ALL.into_iter().find(|d| text.contains(d.name()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::parse(s).ok_or_else(|| format!("unknown direction '{}'", s.trim()))
    }
}

/// What an edge means spatially
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Direction(Direction),
    /// Real connection kept out of grid layout, drawn as a dashed overlay
    CrossGroup,
    None,
}

impl Resolution {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Resolution::Direction(d) => Some(d),
            _ => None,
        }
    }
}

/// Whether a movement command is a raw script
pub fn is_script(command: &str) -> bool {
    command.trim_start().starts_with(SCRIPT_MARKER)
}

/// A `dirto` override naming a real direction, if present
pub fn dirto_override(room: &Room, target: RoomId) -> Option<Direction> {
    room.dirto_for(target).and_then(Direction::parse)
}

/// Whether `room` marks its edge to `target` with the cross-group sentinel
pub fn is_cross_group(room: &Room, target: RoomId) -> bool {
    room.dirto_for(target)
        .is_some_and(|d| d.trim().eq_ignore_ascii_case(CROSS_GROUP_SENTINEL))
}

/// Resolve the edge from `room` to `target`, honoring a cross-group mark on either side
///
/// `reverse` is the target room when it is known. A sentinel on its edge back to `room`
/// makes the pair cross-group in both directions.
pub fn resolve_pair(room: &Room, target: RoomId, reverse: Option<&Room>) -> Resolution {
    if reverse.is_some_and(|other| is_cross_group(other, room.id)) {
        return Resolution::CrossGroup;
    }
    resolve(room, target)
}

/// Resolve the edge from `room` to `target`
pub fn resolve(room: &Room, target: RoomId) -> Resolution {
    if let Some(dirto) = room.dirto_for(target) {
        let dirto = dirto.trim().to_ascii_lowercase();
        match dirto.as_str() {
            CROSS_GROUP_SENTINEL => return Resolution::CrossGroup,
            "none" | "skip" => return Resolution::None,
            other => {
                if let Some(direction) = Direction::parse(other) {
                    return Resolution::Direction(direction);
                }
            }
        }
    }

    let Some(command) = room.wayto_for(target) else {
        return Resolution::None;
    };
    if is_script(command) {
        return Resolution::None;
    }
    if let Some(direction) = Direction::parse(command) {
        return Resolution::Direction(direction);
    }
    match Direction::find_in(command) {
        Some(direction) => Resolution::Direction(direction),
        None => Resolution::None,
    }
}
