//! Group offset composition
//!
//! Two phases: [`compute_base_layout`] places groups side by side with their tops
//! aligned, then [`apply_manual_offsets`] adds user translations and derives group
//! label anchors. Both are pure and return new values.

use indexmap::IndexMap;

use super::types::{
    FinalLayout, GridBounds, GridPos, Group, GroupLabel, GroupOverrides, LabelPlacement,
};

/// Empty grid units between neighbouring groups
pub const GROUP_SPACING: i32 = 3;

/// Fill in each group's base offset, keeping any offset already present
///
/// Group 0 has its minimum corner moved to the origin; each later group starts
/// [`GROUP_SPACING`] units right of the previous group's translated right edge with its
/// top at y = 0. Calling this again on its own output returns the same groups.
pub fn compute_base_layout(groups: &[Group]) -> Vec<Group> {
    let mut ordered: Vec<Group> = groups.to_vec();
    ordered.sort_by_key(|g| g.index);

    let mut previous_right: Option<i32> = None;
    for group in &mut ordered {
        let bounds = group.bounds;
        let base = *group.base_offset.get_or_insert_with(|| match previous_right {
            None => GridPos::new(-bounds.min_x, -bounds.min_y),
            Some(right) => GridPos::new(right + GROUP_SPACING - bounds.min_x, -bounds.min_y),
        });
        previous_right = Some(bounds.max_x + base.x);
    }
    ordered
}

/// Compose final room positions and group label anchors
///
/// Final position = relative position + base offset + manual offset. Groups lacking a
/// base offset get one computed first.
pub fn apply_manual_offsets(groups: &[Group], overrides: &GroupOverrides) -> FinalLayout {
    let groups = compute_base_layout(groups);

    let mut positions = IndexMap::new();
    let mut group_bounds: Vec<(usize, String, Option<GridBounds>)> = Vec::new();

    for group in &groups {
        let translation = group.base_offset.unwrap_or_default() + overrides.offset(group.index);
        for (room, pos) in &group.positions {
            positions.insert(*room, *pos + translation);
        }
        let name = overrides
            .name(group.index)
            .map(str::to_string)
            .unwrap_or_else(|| group.display_name());
        let bounds = GridBounds::from_positions(group.positions.values())
            .map(|b| b.translate(translation));
        group_bounds.push((group.index, name, bounds));
    }

    let mut layout = FinalLayout {
        positions,
        labels: Vec::with_capacity(group_bounds.len()),
    };

    for (index, name, bounds) in group_bounds {
        let Some(bounds) = bounds else {
            continue;
        };
        let mut label = default_label(index, name, &bounds, &layout);
        let shift = overrides.label_offset(index);
        label.x += shift.x as f64;
        label.y += shift.y as f64;
        layout.labels.push(label);
    }

    layout
}

/// Label above the group's horizontal center, or at its left middle when a room
/// already sits in the cell above the center
fn default_label(index: usize, name: String, bounds: &GridBounds, layout: &FinalLayout) -> GroupLabel {
    let center_x = bounds.center_x();
    let above = GridPos::new(center_x.round() as i32, bounds.min_y - 1);

    if layout.is_occupied(above) {
        GroupLabel {
            index,
            name,
            x: bounds.min_x as f64 - 1.0,
            y: bounds.center_y(),
            placement: LabelPlacement::Left,
        }
    } else {
        GroupLabel {
            index,
            name,
            x: center_x,
            y: (bounds.min_y - 1) as f64,
            placement: LabelPlacement::Above,
        }
    }
}
