//! Layout engine for computing room grid positions
//!
//! This module turns a room set into groups of integer grid positions and composes
//! them with manual offsets into a [`FinalLayout`] ready for rendering.

pub mod engine;
pub mod error;
pub mod offsets;
pub mod types;

pub use engine::compute_groups;
pub use error::LayoutError;
pub use offsets::{apply_manual_offsets, compute_base_layout};
pub use types::*;

use crate::room::Room;

/// Run the full layout: grouping, base placement, and manual offsets
///
/// Returns the groups (with base offsets and override names filled in) together with
/// the composed final positions.
pub fn compute(
    rooms: &[Room],
    overrides: &GroupOverrides,
) -> Result<(Vec<Group>, FinalLayout), LayoutError> {
    let groups = compute_groups(rooms)?;
    let mut groups = compute_base_layout(&groups);
    for group in &mut groups {
        if let Some(name) = overrides.name(group.index) {
            group.name = Some(name.to_string());
        }
    }

    let layout = apply_manual_offsets(&groups, overrides);
    if layout.positions.is_empty() {
        return Err(LayoutError::NothingToDraw);
    }
    Ok((groups, layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_names_groups() {
        let rooms = vec![Room::new(1), Room::new(2)];
        let overrides = GroupOverrides::new().with_name(1, "Annex");
        let (groups, layout) = compute(&rooms, &overrides).unwrap();
        assert_eq!(groups[0].display_name(), "Group 1");
        assert_eq!(groups[1].display_name(), "Annex");
        assert_eq!(layout.positions.len(), 2);
    }

    #[test]
    fn test_compute_empty() {
        assert_eq!(
            compute(&[], &GroupOverrides::new()).unwrap_err(),
            LayoutError::EmptyRoomSet
        );
    }
}
