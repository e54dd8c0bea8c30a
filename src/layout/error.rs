//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur during layout computation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// No rooms were supplied
    #[error("no rooms to lay out")]
    EmptyRoomSet,

    /// Composition produced no positioned rooms
    #[error("nothing to draw: no room received a final position")]
    NothingToDraw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_room_set_display() {
        assert!(LayoutError::EmptyRoomSet.to_string().contains("no rooms"));
    }

    #[test]
    fn test_nothing_to_draw_display() {
        assert!(LayoutError::NothingToDraw.to_string().contains("nothing to draw"));
    }
}
