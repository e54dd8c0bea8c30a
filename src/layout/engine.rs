//! Grid layout engine
//!
//! Partitions the room set into groups by breadth-first traversal over resolved
//! directional connections and assigns each room an integer cell relative to its
//! group's start room.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::direction::{resolve_pair, Direction};
use crate::room::{index_by_id, Room, RoomId};

use super::error::LayoutError;
use super::types::{GridPos, Group};

/// Collision retries, each step relative to the previous attempt
///
/// This is a fixed sequence rather than a search: a room whose nine candidate cells are
/// all taken is left unplaced by that edge.
pub const COLLISION_STEPS: [(i32, i32); 8] = [
    (1, 0),
    (-2, 0),
    (1, 1),
    (0, -2),
    (2, 0),
    (-4, 0),
    (0, 3),
    (2, 2),
];

/// Lay out all rooms into independently positioned groups
///
/// Targets missing from `rooms` are ignored. Given the same rooms in the same order
/// (and the same `wayto` key order) the result is identical on every call.
pub fn compute_groups(rooms: &[Room]) -> Result<Vec<Group>, LayoutError> {
    if rooms.is_empty() {
        return Err(LayoutError::EmptyRoomSet);
    }

    let index = index_by_id(rooms);

    let mut positioned: HashSet<RoomId> = HashSet::with_capacity(index.len());
    let mut groups = Vec::new();

    while positioned.len() < index.len() {
        let Some(start) = choose_start(&index, &positioned) else {
            break;
        };
        let group = traverse(start, groups.len(), &index, &mut positioned);
        tracing::debug!(
            group = group.index,
            start,
            rooms = group.rooms.len(),
            "discovered group"
        );
        groups.push(group);
    }

    Ok(groups)
}

/// Number of outgoing connections that resolve to a direction and stay inside the set
fn directional_degree(room: &Room, index: &IndexMap<RoomId, &Room>) -> usize {
    room.exits()
        .filter(|(target, _)| {
            let other = index.get(target).copied();
            other.is_some() && resolve_pair(room, *target, other).direction().is_some()
        })
        .count()
}

/// Unpositioned room with the most directional exits, earliest on ties
fn choose_start(index: &IndexMap<RoomId, &Room>, positioned: &HashSet<RoomId>) -> Option<RoomId> {
    let mut best: Option<(RoomId, usize)> = None;
    for (id, room) in index {
        if positioned.contains(id) {
            continue;
        }
        let degree = directional_degree(room, index);
        if best.map_or(true, |(_, d)| degree > d) {
            best = Some((*id, degree));
        }
    }
    best.map(|(id, _)| id)
}

fn traverse(
    start: RoomId,
    group_index: usize,
    index: &IndexMap<RoomId, &Room>,
    positioned: &mut HashSet<RoomId>,
) -> Group {
    let mut positions: IndexMap<RoomId, GridPos> = IndexMap::new();
    let mut occupied: HashSet<GridPos> = HashSet::new();
    let mut queue = VecDeque::new();

    positions.insert(start, GridPos::ORIGIN);
    occupied.insert(GridPos::ORIGIN);
    positioned.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let Some(room) = index.get(&current) else {
            continue;
        };
        let here = positions[&current];

        for (target, _) in room.exits() {
            if positioned.contains(&target) {
                continue;
            }
            let Some(other) = index.get(&target).copied() else {
                continue;
            };
            let resolution = resolve_pair(room, target, Some(other));
            tracing::trace!(from = current, to = target, ?resolution, "resolved edge");
            let Some(direction) = resolution.direction() else {
                continue;
            };

            match place(here, direction, &occupied) {
                Some(cell) => {
                    positions.insert(target, cell);
                    occupied.insert(cell);
                    positioned.insert(target);
                    queue.push_back(target);
                }
                None => {
                    tracing::debug!(
                        from = current,
                        to = target,
                        %direction,
                        "no free cell after collision retries, edge skipped"
                    );
                }
            }
        }
    }

    Group::new(group_index, positions)
}

/// Cell for a room reached from `from` in `direction`, retrying around collisions
pub fn place(from: GridPos, direction: Direction, occupied: &HashSet<GridPos>) -> Option<GridPos> {
    let mut candidate = from + GridPos::from(direction.unit_offset());
    if !occupied.contains(&candidate) {
        return Some(candidate);
    }
    for step in COLLISION_STEPS {
        candidate += GridPos::from(step);
        if !occupied.contains(&candidate) {
            tracing::debug!(?candidate, "collision resolved by perturbation");
            return Some(candidate);
        }
    }
    None
}
