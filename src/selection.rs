//! Choosing which rooms of a database go on a map

use indexmap::IndexSet;

use crate::room::{Room, RoomId};

/// How the rooms of a map are picked from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMethod {
    /// Every room whose location is one of these names
    Locations(Vec<String>),
    /// Rooms matching a range list such as "35593-35601, 35608"
    Ranges {
        text: String,
        /// Match against alternate ids instead of primary ids
        by_uid: bool,
    },
}

/// A selection plus optional exclusions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub method: SelectionMethod,
    /// Range list of rooms to leave out
    pub exclusions: Option<String>,
    pub exclude_by_uid: bool,
}

impl Selection {
    pub fn locations<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_method(SelectionMethod::Locations(
            names.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn ranges(text: impl Into<String>, by_uid: bool) -> Self {
        Self::from_method(SelectionMethod::Ranges {
            text: text.into(),
            by_uid,
        })
    }

    fn from_method(method: SelectionMethod) -> Self {
        Self {
            method,
            exclusions: None,
            exclude_by_uid: false,
        }
    }

    /// Leave out rooms matching `ranges`; blank input clears the exclusions
    pub fn with_exclusions(mut self, ranges: impl Into<String>, by_uid: bool) -> Self {
        let ranges = ranges.into();
        self.exclusions = (!ranges.trim().is_empty()).then(|| ranges.trim().to_string());
        self.exclude_by_uid = by_uid;
        self
    }

    /// Selected rooms in database order
    pub fn apply(&self, rooms: &[Room]) -> Vec<Room> {
        let selected = match &self.method {
            SelectionMethod::Locations(names) => by_locations(rooms, names),
            SelectionMethod::Ranges { text, by_uid } => {
                let ids = parse_room_ranges(text);
                if *by_uid {
                    by_uids(rooms, &ids)
                } else {
                    by_ids(rooms, &ids)
                }
            }
        };

        let selected = match &self.exclusions {
            Some(text) => exclude(selected, &parse_room_ranges(text), self.exclude_by_uid),
            None => selected,
        };
        tracing::debug!(rooms = selected.len(), id = %self.map_identifier(), "selected rooms");
        selected
    }

    /// Stable identifier for the selection, used to name coordinate files
    ///
    /// `location_<names sorted, comma-joined>` or `id_<ranges>` / `uid_<ranges>`, followed
    /// by `_exclude_<ranges>` when exclusions are present. Exclusion text keeps only
    /// digits, commas and dashes.
    pub fn map_identifier(&self) -> String {
        let base = match &self.method {
            SelectionMethod::Locations(names) => {
                let mut names = names.clone();
                names.sort();
                format!("location_{}", names.join(","))
            }
            SelectionMethod::Ranges { text, by_uid } => {
                let kind = if *by_uid { "uid" } else { "id" };
                format!("{}_{}", kind, text.trim())
            }
        };
        match &self.exclusions {
            Some(text) => {
                let kept: String = text
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '-')
                    .collect();
                format!("{}_exclude_{}", base, kept)
            }
            None => base,
        }
    }
}

/// Parse a comma-separated list of ids and inclusive `a-b` ranges
///
/// Pieces that do not start with a positive number are ignored, as are ranges whose
/// start exceeds their end. Ids come back in first-mention order without repeats.
pub fn parse_room_ranges(text: &str) -> Vec<RoomId> {
    let mut ids: IndexSet<RoomId> = IndexSet::new();
    for piece in text.split(',').map(str::trim) {
        if let Some((start, end)) = piece.split_once('-') {
            if let (Some(start), Some(end)) = (leading_id(start), leading_id(end)) {
                ids.extend(start..=end);
            }
        } else if let Some(id) = leading_id(piece) {
            ids.insert(id);
        }
    }
    ids.into_iter().collect()
}

/// Leading decimal digits of `text` as a non-zero id
fn leading_id(text: &str) -> Option<RoomId> {
    let text = text.trim();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok().filter(|id| *id != 0)
}

/// Distinct location names, sorted
pub fn locations(rooms: &[Room]) -> Vec<String> {
    let mut names: Vec<String> = rooms
        .iter()
        .filter_map(|r| r.location.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();
    names.sort();
    names
}

/// Rooms in any of the named locations
pub fn by_locations(rooms: &[Room], names: &[String]) -> Vec<Room> {
    let mut seen: IndexSet<RoomId> = IndexSet::new();
    rooms
        .iter()
        .filter(|r| r.location.as_ref().is_some_and(|l| names.contains(l)))
        .filter(|r| seen.insert(r.id))
        .cloned()
        .collect()
}

pub fn by_ids(rooms: &[Room], ids: &[RoomId]) -> Vec<Room> {
    rooms.iter().filter(|r| ids.contains(&r.id)).cloned().collect()
}

/// Rooms having at least one alternate id in `uids`
pub fn by_uids(rooms: &[Room], uids: &[RoomId]) -> Vec<Room> {
    rooms
        .iter()
        .filter(|r| r.uid.iter().any(|u| uids.contains(u)))
        .cloned()
        .collect()
}

/// Drop rooms matching `ids`; by alternate id, rooms without any are kept
pub fn exclude(rooms: Vec<Room>, ids: &[RoomId], by_uid: bool) -> Vec<Room> {
    rooms
        .into_iter()
        .filter(|r| {
            if by_uid {
                !r.uid.iter().any(|u| ids.contains(u))
            } else {
                !ids.contains(&r.id)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn db() -> Vec<Room> {
        vec![
            Room::new(1).with_location("Harbor").with_uid(101),
            Room::new(2).with_location("Harbor").with_uid(102),
            Room::new(3).with_location("Market"),
            Room::new(4).with_location("Keep").with_uid(104),
            Room::new(5),
        ]
    }

    fn ids(rooms: &[Room]) -> Vec<RoomId> {
        rooms.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_parse_room_ranges() {
        assert_eq!(parse_room_ranges("35593-35596, 35608"), vec![35593, 35594, 35595, 35596, 35608]);
        assert_eq!(parse_room_ranges("3, 1-2, 2"), vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_room_ranges_ignores_garbage() {
        assert_eq!(parse_room_ranges("abc, 0, 5-x, , 7"), vec![7]);
        assert_eq!(parse_room_ranges("9-4"), Vec::<RoomId>::new());
        assert_eq!(parse_room_ranges("12abc"), vec![12]);
    }

    #[test]
    fn test_locations_sorted_unique() {
        assert_eq!(locations(&db()), vec!["Harbor", "Keep", "Market"]);
    }

    #[test]
    fn test_select_by_location() {
        let rooms = Selection::locations(["Market", "Harbor"]).apply(&db());
        assert_eq!(ids(&rooms), vec![1, 2, 3]);
    }

    #[test]
    fn test_select_by_ids_and_uids() {
        assert_eq!(ids(&Selection::ranges("2-4", false).apply(&db())), vec![2, 3, 4]);
        assert_eq!(ids(&Selection::ranges("101, 104", true).apply(&db())), vec![1, 4]);
    }

    #[test]
    fn test_exclusions() {
        let rooms = Selection::ranges("1-5", false)
            .with_exclusions("2, 4", false)
            .apply(&db());
        assert_eq!(ids(&rooms), vec![1, 3, 5]);

        let rooms = Selection::ranges("1-5", false)
            .with_exclusions("101", true)
            .apply(&db());
        assert_eq!(ids(&rooms), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_map_identifier_location() {
        let selection = Selection::locations(["Market", "Harbor"]);
        insta::assert_snapshot!(selection.map_identifier(), @"location_Harbor,Market");
    }

    #[test]
    fn test_map_identifier_ranges_with_exclusions() {
        let selection = Selection::ranges("100-120", true).with_exclusions("105, 110 (broken)", false);
        insta::assert_snapshot!(selection.map_identifier(), @"uid_100-120_exclude_105,110");
    }

    #[test]
    fn test_blank_exclusions_ignored() {
        let selection = Selection::ranges("1", false).with_exclusions("   ", false);
        assert_eq!(selection.exclusions, None);
        assert_eq!(selection.map_identifier(), "id_1");
    }
}
