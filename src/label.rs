//! Connection labels
//!
//! A short human-readable string describing how a connection is traversed. Labels are
//! independent of layout: an edge can carry a label whether or not it resolves to a
//! direction, and the absence of a label is a normal outcome.

use std::sync::OnceLock;

use regex::Regex;

use crate::direction::{dirto_override, is_script, Direction};
use crate::room::{Room, RoomId};

/// Raw commands longer than this are never shown verbatim
pub const MAX_VERBATIM_LEN: usize = 20;

const ACTION_VERBS: [&str; 3] = ["go", "climb", "move"];

fn script_move_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:go|move)\s+['"]?(?:go\s+)?([a-z][a-z0-9_-]*)"#)
            .expect("script movement pattern should compile")
    })
}

/// Label for the connection from `room` to `target`
pub fn extract_label(room: &Room, target: RoomId) -> Option<String> {
    let command = room.wayto_for(target)?.trim();
    let override_dir = dirto_override(room, target);

    if is_script(command) {
        override_dir?;
        return script_token(command);
    }

    if let Some(direction) = Direction::parse(command) {
        return override_dir
            .filter(|o| *o != direction)
            .map(|o| o.name().to_string());
    }

    if let Some(object) = action_object(command) {
        return Some(object.to_string());
    }

    if !command.is_empty() && command.chars().count() <= MAX_VERBATIM_LEN {
        return Some(command.to_string());
    }
    None
}

/// First "go X" / "move X" token inside a script that is not itself a direction
fn script_token(command: &str) -> Option<String> {
    script_move_regex()
        .captures_iter(command)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|token| Direction::parse(token).is_none())
        .map(str::to_string)
}

/// Object of a `<verb> <object>` phrase
fn action_object(command: &str) -> Option<&str> {
    let (verb, rest) = command.split_once(char::is_whitespace)?;
    if !ACTION_VERBS.iter().any(|v| v.eq_ignore_ascii_case(verb)) {
        return None;
    }
    let object = rest.trim();
    (!object.is_empty()).then_some(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_direction_has_no_label() {
        let room = Room::new(1).with_exit(2, "north");
        assert_eq!(extract_label(&room, 2), None);
    }

    #[test]
    fn test_direction_with_different_override() {
        let room = Room::new(1).with_exit(2, "north").with_dirto(2, "up");
        assert_eq!(extract_label(&room, 2), Some("up".to_string()));
    }

    #[test]
    fn test_direction_with_same_override() {
        let room = Room::new(1).with_exit(2, "north").with_dirto(2, "NORTH");
        assert_eq!(extract_label(&room, 2), None);
    }

    #[test]
    fn test_action_phrase() {
        let room = Room::new(1)
            .with_exit(2, "go ladder")
            .with_exit(3, "climb stone stair")
            .with_exit(4, "Move arch");
        assert_eq!(extract_label(&room, 2), Some("ladder".to_string()));
        assert_eq!(extract_label(&room, 3), Some("stone stair".to_string()));
        assert_eq!(extract_label(&room, 4), Some("arch".to_string()));
    }

    #[test]
    fn test_short_command_verbatim() {
        let room = Room::new(1).with_exit(2, "pull lever");
        assert_eq!(extract_label(&room, 2), Some("pull lever".to_string()));
    }

    #[test]
    fn test_long_command_dropped() {
        let room = Room::new(1).with_exit(2, "push the very heavy boulder aside");
        assert_eq!(extract_label(&room, 2), None);
    }

    #[test]
    fn test_script_without_override() {
        let room = Room::new(1).with_exit(2, ";e multifput 'search', 'go passage'");
        assert_eq!(extract_label(&room, 2), None);
    }

    #[test]
    fn test_script_with_override() {
        let room = Room::new(1)
            .with_exit(2, ";e multifput 'search', 'go passage'")
            .with_dirto(2, "north");
        assert_eq!(extract_label(&room, 2), Some("passage".to_string()));
    }

    #[test]
    fn test_script_nested_go() {
        let room = Room::new(1)
            .with_exit(2, ";e fput 'look barrel' ; move 'go chute'")
            .with_dirto(2, "down");
        assert_eq!(extract_label(&room, 2), Some("chute".to_string()));
    }

    #[test]
    fn test_script_skips_direction_tokens() {
        let room = Room::new(1)
            .with_exit(2, ";e move 'northeast'; waitrt?")
            .with_dirto(2, "northeast");
        assert_eq!(extract_label(&room, 2), None);
    }

    #[test]
    fn test_missing_target() {
        let room = Room::new(1);
        assert_eq!(extract_label(&room, 5), None);
    }
}
