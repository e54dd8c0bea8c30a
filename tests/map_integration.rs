//! End-to-end map generation from room database JSON

use room_mapper::renderer::{CrossGroupConnection, CustomLabel, LineStyle, RoomShape};
use room_mapper::{
    generate_map, parse_rooms, ConfigError, GroupOverrides, MapError, RenderConfig, Theme,
};

const HARBOR: &str = r#"[
    {
        "id": 100,
        "title": ["[Harbor, Long Pier]"],
        "location": "Harbor",
        "tags": ["water"],
        "wayto": {"101": "east", "102": "go gangplank"},
        "dirto": {"102": "south"}
    },
    {
        "id": 101,
        "title": ["[Harbor, Fish Market]"],
        "location": "Harbor",
        "tags": ["shop"],
        "wayto": {"100": "west", "103": ";e fput 'climb ladder'; move 'go hatch'"},
        "timeto": {"100": 0.2}
    },
    {
        "id": 102,
        "title": ["[Harbor, Cargo Ship]"],
        "location": "Harbor",
        "wayto": {"100": "go pier"},
        "dirto": {"100": "north"}
    },
    {
        "id": 103,
        "title": ["[Harbor, Smuggler Den]"],
        "location": "Harbor",
        "wayto": {"101": "up"},
        "dirto": null
    },
    {
        "id": 200,
        "title": ["[Lighthouse, Lamp Room]"],
        "location": "Lighthouse",
        "wayto": {"100": "row boat"},
        "dirto": {"100": "cross-group"}
    }
]"#;

fn generate(config: &RenderConfig) -> String {
    let rooms = parse_rooms(HARBOR).unwrap();
    generate_map(&rooms, config, &GroupOverrides::new()).unwrap().svg
}

#[test]
fn test_every_room_drawn() {
    let svg = generate(&RenderConfig::default());
    for id in [100, 101, 102, 103, 200] {
        assert!(svg.contains(&format!(r#"id="map-room-{}""#, id)), "room {}", id);
    }
}

#[test]
fn test_groups_and_names() {
    let rooms = parse_rooms(HARBOR).unwrap();
    let overrides = GroupOverrides::new().with_name(2, "Lighthouse");
    let map = generate_map(&rooms, &RenderConfig::default(), &overrides).unwrap();

    // 103 is only reachable over its own outgoing "up" edge, so it starts a group.
    assert_eq!(map.groups.len(), 3);
    assert_eq!(map.groups[0].rooms, vec![100, 101, 102]);
    assert_eq!(map.groups[1].rooms, vec![103]);
    assert_eq!(map.groups[2].display_name(), "Lighthouse");
    assert!(map.svg.contains(">Lighthouse</text>"));
    assert!(map.svg.contains(">Group 1</text>"));
}

#[test]
fn test_connection_labels() {
    let svg = generate(&RenderConfig::default());
    assert!(svg.contains(">gangplank</text>"));
    assert!(svg.contains(">pier</text>"));
    // Scripts without a direction override carry no label.
    assert!(!svg.contains(">hatch</text>"));
}

#[test]
fn test_script_edge_not_drawn_without_override() {
    let svg = generate(&RenderConfig::default());
    // 100-101, 100-102 and 101-103 (via "up") are ordinary connections.
    assert_eq!(svg.matches(r#"<line class="map-connection"#).count(), 3);
    assert_eq!(svg.matches("map-vertical").count(), 1);
}

#[test]
fn test_cross_group_dashed_regardless_of_settings() {
    let mut config = RenderConfig::default();
    config.display.show_connections = false;
    config.display.show_labels = false;
    let svg = generate(&config);

    assert!(!svg.contains(r#"<line class="map-connection"#));
    assert_eq!(svg.matches(r#"class="map-cross-connection""#).count(), 1);
    assert!(svg.contains(r#"stroke-dasharray="5,5""#));
}

#[test]
fn test_manual_cross_group_connection_style() {
    let mut config = RenderConfig::default();
    let mut link = CrossGroupConnection::new(103, 200);
    link.style = LineStyle::Dotted;
    link.color = Some("#aa0000".to_string());
    config.add_cross_group_connection(link).unwrap();

    let svg = generate(&config);
    assert_eq!(svg.matches("map-cross-connection").count(), 2);
    assert!(svg.contains(r##"stroke="#aa0000" stroke-width="2" stroke-dasharray="2,3""##));
}

#[test]
fn test_theme_tag_colors() {
    let theme = Theme::preset("maritime").unwrap();
    let config = RenderConfig::default().with_theme(&theme);
    let svg = generate(&config);
    let shop = theme.tags.get("shop").unwrap();
    assert!(svg.contains(&format!(r#"fill="{}""#, shop)));
    assert!(svg.contains(&format!(r#"fill="{}""#, theme.colors.background)));
}

#[test]
fn test_room_names_and_custom_labels() {
    let mut config = RenderConfig::default()
        .with_room_shape(RoomShape::Rectangle)
        .with_custom_label(CustomLabel::new("Here be smugglers & rats").at(120.0, 40.0));
    config.display.show_room_names = true;

    let svg = generate(&config);
    assert!(svg.contains(">Fish Market</text>"));
    assert!(svg.contains("Here be smugglers &amp; rats"));
    assert!(svg.contains("map-custom-label-box"));
}

#[test]
fn test_compact_output() {
    let mut config = RenderConfig::default().with_pretty_print(false);
    config.standalone = false;
    config.class_prefix = None;
    let svg = generate(&config);
    assert!(svg.starts_with("<svg"));
    assert!(!svg.contains('\n'));
    assert!(svg.contains(r#"class="room rect""#));
}

#[test]
fn test_invalid_config_rejected() {
    let rooms = parse_rooms(HARBOR).unwrap();
    let config = RenderConfig::default().with_edge_length(-10.0);
    let err = generate_map(&rooms, &config, &GroupOverrides::new()).unwrap_err();
    assert!(matches!(
        err,
        MapError::Config(ConfigError::NonPositive {
            field: "edge_length",
            ..
        })
    ));
}

#[test]
fn test_generation_is_deterministic() {
    let config = RenderConfig::default();
    assert_eq!(generate(&config), generate(&config));
}
