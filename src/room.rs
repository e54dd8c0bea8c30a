//! Room records as supplied by the caller
//!
//! Rooms are read-only inputs: the layout engine and renderer only ever borrow them.
//! The JSON shape matches a map database export, where unknown fields are ignored
//! and `wayto` key order is preserved because layout determinism depends on it.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LoadError;

/// Integer room identity
pub type RoomId = i64;

/// A single room with its outgoing connections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,

    /// Alternate identities
    #[serde(default, deserialize_with = "nullable")]
    pub uid: Vec<RoomId>,

    /// Target room id (as a string key) -> raw movement command
    #[serde(default, deserialize_with = "nullable")]
    pub wayto: IndexMap<String, String>,

    /// Target room id -> explicit direction override or control sentinel
    #[serde(default, deserialize_with = "nullable")]
    pub dirto: IndexMap<String, String>,

    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub title: Vec<String>,

    #[serde(default)]
    pub location: Option<String>,
}

/// Treat an explicit `null` the same as a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Add an outgoing connection
    pub fn with_exit(mut self, target: RoomId, command: impl Into<String>) -> Self {
        self.wayto.insert(target.to_string(), command.into());
        self
    }

    /// Add a direction override for an outgoing connection
    pub fn with_dirto(mut self, target: RoomId, direction: impl Into<String>) -> Self {
        self.dirto.insert(target.to_string(), direction.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title.push(title.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_uid(mut self, uid: RoomId) -> Self {
        self.uid.push(uid);
        self
    }

    /// Outgoing connections whose key parses as a room id, in `wayto` order
    pub fn exits(&self) -> impl Iterator<Item = (RoomId, &str)> + '_ {
        self.wayto
            .iter()
            .filter_map(|(key, command)| parse_key(key).map(|id| (id, command.as_str())))
    }

    /// The `dirto` entry for a target, if any
    pub fn dirto_for(&self, target: RoomId) -> Option<&str> {
        entry_for(&self.dirto, target)
    }

    /// The `wayto` command for a target, if any
    pub fn wayto_for(&self, target: RoomId) -> Option<&str> {
        entry_for(&self.wayto, target)
    }
}

fn parse_key(key: &str) -> Option<RoomId> {
    key.trim().parse().ok()
}

/// Keys are matched by the id they parse to, so "02" and " 2" both name room 2
fn entry_for(map: &IndexMap<String, String>, target: RoomId) -> Option<&str> {
    if let Some(value) = map.get(&target.to_string()) {
        return Some(value.as_str());
    }
    map.iter()
        .find(|(key, _)| parse_key(key) == Some(target))
        .map(|(_, value)| value.as_str())
}

/// Rooms by id, keeping the first room for each id in input order
pub fn index_by_id(rooms: &[Room]) -> IndexMap<RoomId, &Room> {
    let mut index = IndexMap::with_capacity(rooms.len());
    for room in rooms {
        index.entry(room.id).or_insert(room);
    }
    index
}

/// Parse a JSON array of rooms
///
/// Rooms sharing an id keep only the first occurrence.
pub fn parse_rooms(json: &str) -> Result<Vec<Room>, LoadError> {
    let rooms: Vec<Room> = serde_json::from_str(json)?;
    let mut seen = std::collections::HashSet::new();
    let total = rooms.len();
    let rooms: Vec<Room> = rooms.into_iter().filter(|r| seen.insert(r.id)).collect();
    if rooms.len() != total {
        tracing::debug!(dropped = total - rooms.len(), "ignored duplicate room ids");
    }
    Ok(rooms)
}

/// Load a JSON room database from disk
pub fn load_rooms(path: &Path) -> Result<Vec<Room>, LoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_rooms(&content)
}
