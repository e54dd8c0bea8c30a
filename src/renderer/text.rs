//! Text measurement and room name extraction

use crate::room::Room;

/// Average glyph width as a fraction of the font size
const CHAR_WIDTH_RATIO: f64 = 0.6;
const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Estimated rendered width of a single line
pub fn estimate_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH_RATIO
}

pub fn line_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT_RATIO
}

/// Greedy word wrap; words longer than `max_chars` get a line of their own
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Short display name from a room's title
///
/// Uses the first bracketed segment of the title, keeping only the part after its last
/// comma: "[Wehnimer's Landing, Town Square]" becomes "Town Square". Titles without
/// brackets are used whole.
pub fn room_name(room: &Room) -> Option<String> {
    let title = room.title.iter().map(|t| t.trim()).find(|t| !t.is_empty())?;
    let inner = bracketed(title).unwrap_or(title);
    let name = match inner.rsplit_once(',') {
        Some((_, tail)) => tail.trim(),
        None => inner.trim(),
    };
    (!name.is_empty()).then(|| name.to_string())
}

fn bracketed(title: &str) -> Option<&str> {
    let start = title.find('[')?;
    let end = title[start + 1..].find(']')?;
    Some(&title[start + 1..start + 1 + end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_width() {
        assert_eq!(estimate_width("abcd", 10.0), 24.0);
        assert_eq!(line_height(10.0), 12.0);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(
            wrap("Town Square Central", 12),
            vec!["Town Square".to_string(), "Central".to_string()]
        );
        assert_eq!(wrap("Extraordinarily long", 5).len(), 2);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_room_name_after_last_comma() {
        let room = Room::new(1).with_title("[Wehnimer's Landing, Town Square]");
        assert_eq!(room_name(&room), Some("Town Square".to_string()));
    }

    #[test]
    fn test_room_name_without_comma() {
        let room = Room::new(1).with_title("[The Great Hall]");
        assert_eq!(room_name(&room), Some("The Great Hall".to_string()));
    }

    #[test]
    fn test_room_name_without_brackets() {
        let room = Room::new(1).with_title("A dusty road");
        assert_eq!(room_name(&room), Some("A dusty road".to_string()));
    }

    #[test]
    fn test_room_name_missing() {
        assert_eq!(room_name(&Room::new(1)), None);
        assert_eq!(room_name(&Room::new(1).with_title("[ ]")), None);
    }
}
