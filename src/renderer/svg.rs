//! SVG generation from a composed layout

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::direction::{resolve_pair, Resolution};
use crate::label::extract_label;
use crate::layout::{FinalLayout, LabelPlacement, LayoutError};
use crate::room::{index_by_id, Room, RoomId};
use crate::MapError;

use super::config::{BackgroundFit, FontStyle, RenderConfig, RoomShape};
use super::geometry::{room_extent, Point, Viewport};
use super::text::{estimate_width, line_height, room_name, wrap};

/// Drawing layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Background,
    GroupLabels,
    CrossConnections,
    Connections,
    ConnectionLabels,
    CustomLabels,
    Rooms,
    RoomText,
}

const LAYER_COUNT: usize = 8;

/// Build SVG elements incrementally, layer by layer
pub struct SvgBuilder<'a> {
    config: &'a RenderConfig,
    defs: Vec<String>,
    layers: [Vec<String>; LAYER_COUNT],
}

impl<'a> SvgBuilder<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            defs: vec![],
            layers: Default::default(),
        }
    }

    fn prefix(&self) -> &str {
        self.config.prefix()
    }

    fn class(&self, names: &[&str]) -> String {
        names
            .iter()
            .map(|n| format!("{}{}", self.prefix(), n))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn push(&mut self, layer: Layer, element: String) {
        self.layers[layer as usize].push(element);
    }

    fn indent_str(&self) -> &str {
        if self.config.pretty_print {
            "  "
        } else {
            ""
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Flat background, optionally covered by a stretched or tiled image
    pub fn add_background(&mut self, viewport: &Viewport) {
        let config = self.config;
        let class = self.class(&["background"]);
        self.push(
            Layer::Background,
            format!(
                r#"<rect class="{}" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
                class,
                num(viewport.width),
                num(viewport.height),
                escape_xml(&config.colors.background)
            ),
        );

        let Some(image) = &config.background_image else {
            return;
        };
        let href = escape_xml(&image.href);
        match image.fit {
            BackgroundFit::Stretch => {
                self.push(
                    Layer::Background,
                    format!(
                        r#"<image class="{}" href="{}" x="0" y="0" width="{}" height="{}" preserveAspectRatio="none"/>"#,
                        class,
                        href,
                        num(viewport.width),
                        num(viewport.height)
                    ),
                );
            }
            BackgroundFit::Tile => {
                let (tw, th) = image
                    .tile_size
                    .unwrap_or((config.edge_length, config.edge_length));
                let id = format!("{}background-tile", self.prefix());
                self.defs.push(format!(
                    r#"<pattern id="{}" patternUnits="userSpaceOnUse" width="{}" height="{}"><image href="{}" width="{}" height="{}"/></pattern>"#,
                    id,
                    num(tw),
                    num(th),
                    href,
                    num(tw),
                    num(th)
                ));
                self.push(
                    Layer::Background,
                    format!(
                        r#"<rect class="{}" x="0" y="0" width="{}" height="{}" fill="url(#{})"/>"#,
                        class,
                        num(viewport.width),
                        num(viewport.height),
                        id
                    ),
                );
            }
        }
    }

    /// Add a plain straight line
    pub fn add_line(&mut self, from: Point, to: Point, classes: &[&str], styles: &str) {
        let class = self.class(classes);
        self.push_line(Layer::Connections, &class, from, to, styles);
    }

    /// Add a dashed cross-group line
    pub fn add_cross_line(&mut self, from: Point, to: Point, styles: &str) {
        let class = self.class(&["cross-connection"]);
        self.push_line(Layer::CrossConnections, &class, from, to, styles);
    }

    fn push_line(&mut self, layer: Layer, class: &str, from: Point, to: Point, styles: &str) {
        self.push(
            layer,
            format!(
                r#"<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                class,
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y),
                styles
            ),
        );
    }

    /// Add a text element
    #[allow(clippy::too_many_arguments)]
    fn add_text(
        &mut self,
        layer: Layer,
        classes: &[&str],
        text: &str,
        at: Point,
        anchor: &str,
        font: &FontStyle,
        extra: &str,
    ) {
        let class = self.class(classes);
        self.push(
            layer,
            format!(
                r#"<text class="{}" x="{}" y="{}" text-anchor="{}"{}{}>{}</text>"#,
                class,
                num(at.x),
                num(at.y),
                anchor,
                font_attrs(font),
                extra,
                escape_xml(text)
            ),
        );
    }

    /// Add a box behind text, `x`/`y` being its top-left corner
    #[allow(clippy::too_many_arguments)]
    fn add_box(
        &mut self,
        layer: Layer,
        classes: &[&str],
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        styles: &str,
    ) {
        let class = self.class(classes);
        self.push(
            layer,
            format!(
                r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" rx="3"{}/>"#,
                class,
                num(x),
                num(y),
                num(w),
                num(h),
                styles
            ),
        );
    }

    /// Add a room shape centered on `center`
    pub fn add_room(&mut self, id: RoomId, center: Point, fill: &str) {
        let config = self.config;
        let (hw, hh) = room_extent(config.room_shape, config.room_size);
        let styles = format!(
            r#" fill="{}" stroke="{}" stroke-width="{}""#,
            escape_xml(fill),
            escape_xml(&config.colors.room_stroke),
            num(config.stroke_width)
        );
        let prefix = self.prefix().to_string();
        let element = match config.room_shape {
            RoomShape::Circle => format!(
                r#"<circle id="{}room-{}" class="{}" cx="{}" cy="{}" r="{}"{}/>"#,
                prefix,
                id,
                self.class(&["room", "circle"]),
                num(center.x),
                num(center.y),
                num(hw),
                styles
            ),
            RoomShape::Square | RoomShape::Rectangle => format!(
                r#"<rect id="{}room-{}" class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
                prefix,
                id,
                self.class(&["room", "rect"]),
                num(center.x - hw),
                num(center.y - hh),
                num(hw * 2.0),
                num(hh * 2.0),
                styles
            ),
        };
        self.push(Layer::Rooms, element);
    }

    /// Build the final SVG string
    pub fn build(self, viewport: &Viewport) -> String {
        let nl = self.newline().to_string();
        let indent = self.indent_str().to_string();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(&nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(viewport.width),
            h = num(viewport.height)
        ));
        svg.push_str(&nl);

        if !self.defs.is_empty() {
            svg.push_str(&indent);
            svg.push_str("<defs>");
            svg.push_str(&nl);
            for def in &self.defs {
                svg.push_str(&indent);
                svg.push_str(&indent);
                svg.push_str(def);
                svg.push_str(&nl);
            }
            svg.push_str(&indent);
            svg.push_str("</defs>");
            svg.push_str(&nl);
        }

        for layer in &self.layers {
            for element in layer {
                svg.push_str(&indent);
                svg.push_str(element);
                svg.push_str(&nl);
            }
        }

        svg.push_str("</svg>");
        svg
    }
}

/// An ordinary connection between two positioned rooms
#[derive(Debug, Clone, PartialEq)]
struct Edge {
    from: RoomId,
    to: RoomId,
    vertical: bool,
    labels: Vec<String>,
}

/// Collect drawable connections, one per unordered room pair
///
/// Ordinary edges resolve to a direction on at least one side; cross-group edges are
/// returned separately as pairs. A cross-group mark on either side claims the pair.
fn collect_edges(
    rooms: &IndexMap<RoomId, &Room>,
    layout: &FinalLayout,
) -> (Vec<Edge>, Vec<(RoomId, RoomId)>) {
    let mut edges: Vec<Edge> = Vec::new();
    let mut edge_index: HashMap<(RoomId, RoomId), usize> = HashMap::new();
    let mut cross: Vec<(RoomId, RoomId)> = Vec::new();

    for room in rooms.values() {
        if layout.position(room.id).is_none() {
            continue;
        }
        for (target, _) in room.exits() {
            if target == room.id || layout.position(target).is_none() {
                continue;
            }
            let key = pair_key(room.id, target);
            match resolve_pair(room, target, rooms.get(&target).copied()) {
                Resolution::CrossGroup => {
                    if !cross.iter().any(|p| pair_key(p.0, p.1) == key) {
                        cross.push((room.id, target));
                    }
                }
                Resolution::Direction(direction) => {
                    if let Some(&i) = edge_index.get(&key) {
                        edges[i].vertical |= direction.is_vertical();
                    } else {
                        edge_index.insert(key, edges.len());
                        edges.push(Edge {
                            from: room.id,
                            to: target,
                            vertical: direction.is_vertical(),
                            labels: vec![],
                        });
                    }
                }
                Resolution::None => {}
            }
        }
    }

    // Labels come from both endpoints, source side first.
    for edge in &mut edges {
        for (source, target) in [(edge.from, edge.to), (edge.to, edge.from)] {
            let Some(room) = rooms.get(&source) else {
                continue;
            };
            if let Some(label) = extract_label(room, target) {
                if !edge.labels.contains(&label) {
                    edge.labels.push(label);
                }
            }
        }
    }

    (edges, cross)
}

fn pair_key(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Rotation keeping text upright along the segment, in degrees within (-90, 90]
fn label_angle(from: Point, to: Point) -> f64 {
    let mut angle = (to.y - from.y).atan2(to.x - from.x).to_degrees();
    if angle > 90.0 {
        angle -= 180.0;
    } else if angle <= -90.0 {
        angle += 180.0;
    }
    angle
}

/// Render rooms at their composed positions into an SVG document
pub fn render_svg(
    rooms: &[Room],
    layout: &FinalLayout,
    config: &RenderConfig,
) -> Result<String, MapError> {
    config.validate()?;
    let bounds = layout.bounds().ok_or(LayoutError::NothingToDraw)?;
    let viewport = Viewport::new(bounds, config.edge_length);
    let mut builder = SvgBuilder::new(config);
    let center = |id: RoomId| layout.position(id).map(|p| viewport.to_pixels(p));

    builder.add_background(&viewport);

    if config.display.show_group_labels {
        render_group_labels(layout, &viewport, &mut builder);
    }

    let rooms = index_by_id(rooms);
    let (edges, auto_cross) = collect_edges(&rooms, layout);

    render_cross_connections(&auto_cross, &center, &mut builder);

    if config.display.show_connections {
        for edge in &edges {
            let (Some(a), Some(b)) = (center(edge.from), center(edge.to)) else {
                continue;
            };
            let (classes, color): (&[&str], &str) = if edge.vertical {
                (
                    &["connection", "vertical"][..],
                    config.colors.vertical_connections.as_str(),
                )
            } else {
                (&["connection"][..], config.colors.connections.as_str())
            };
            let styles = format!(
                r#" stroke="{}" stroke-width="{}""#,
                escape_xml(color),
                num(config.connection_width)
            );
            builder.add_line(a, b, classes, &styles);
        }
    }

    if config.display.show_labels {
        for edge in &edges {
            let (Some(a), Some(b)) = (center(edge.from), center(edge.to)) else {
                continue;
            };
            render_connection_labels(&edge.labels, a, b, &mut builder);
        }
    }

    render_custom_labels(&mut builder);

    let mut drawn = 0usize;
    for room in rooms.values() {
        let Some(c) = center(room.id) else {
            continue;
        };
        builder.add_room(room.id, c, config.room_fill(room));
        render_room_text(room, c, &mut builder);
        drawn += 1;
    }

    tracing::debug!(
        rooms = drawn,
        connections = edges.len(),
        cross_connections = auto_cross.len() + config.cross_group_connections.len(),
        width = viewport.width,
        height = viewport.height,
        "rendered map"
    );

    Ok(builder.build(&viewport))
}

fn render_group_labels(layout: &FinalLayout, viewport: &Viewport, builder: &mut SvgBuilder) {
    let config = builder.config;
    let font = &config.fonts.groups;
    for label in &layout.labels {
        let at = viewport.point(label.x, label.y);
        let w = estimate_width(&label.name, font.size) + 8.0;
        let h = line_height(font.size) + 4.0;
        let (box_x, anchor) = match label.placement {
            LabelPlacement::Above => (at.x - w / 2.0, "middle"),
            LabelPlacement::Left => (at.x - w, "end"),
        };
        let text_x = match label.placement {
            LabelPlacement::Above => at.x,
            LabelPlacement::Left => at.x - 4.0,
        };
        let box_styles = format!(
            r#" fill="{}" stroke="{}" stroke-width="1""#,
            escape_xml(&config.colors.background),
            escape_xml(&config.colors.connections)
        );
        builder.add_box(
            Layer::GroupLabels,
            &["group-label-box"],
            box_x,
            at.y - h / 2.0,
            w,
            h,
            &box_styles,
        );
        builder.add_text(
            Layer::GroupLabels,
            &["group-label"],
            &label.name,
            Point::new(text_x, at.y),
            anchor,
            font,
            r#" dominant-baseline="middle""#,
        );
    }
}

fn render_cross_connections(
    auto_cross: &[(RoomId, RoomId)],
    center: &dyn Fn(RoomId) -> Option<Point>,
    builder: &mut SvgBuilder,
) {
    let config = builder.config;
    let mut drawn: Vec<(RoomId, RoomId)> = Vec::new();

    let manual = config.cross_group_connections.iter().map(|c| {
        (
            c.from_id,
            c.to_id,
            c.color.as_deref().unwrap_or(config.cross_group_color()),
            c.dasharray(),
        )
    });
    let automatic = auto_cross.iter().map(|&(a, b)| {
        (
            a,
            b,
            config.cross_group_color(),
            Some(config.cross_group_dash.as_str()).filter(|d| !d.is_empty()),
        )
    });

    for (a, b, color, dash) in manual.chain(automatic) {
        let key = pair_key(a, b);
        if drawn.contains(&key) {
            continue;
        }
        let (Some(p), Some(q)) = (center(a), center(b)) else {
            tracing::debug!(from = a, to = b, "cross-group endpoint not on map, skipped");
            continue;
        };
        drawn.push(key);
        let dash_attr = dash
            .map(|d| format!(r#" stroke-dasharray="{}""#, escape_xml(d)))
            .unwrap_or_default();
        let styles = format!(
            r#" stroke="{}" stroke-width="{}"{}"#,
            escape_xml(color),
            num(config.connection_width),
            dash_attr
        );
        builder.add_cross_line(p, q, &styles);
    }
}

fn render_connection_labels(labels: &[String], a: Point, b: Point, builder: &mut SvgBuilder) {
    let config = builder.config;
    let font = &config.fonts.labels;
    let mid = a.midpoint(&b);
    let angle = label_angle(a, b);
    let rotate = format!(
        r#" transform="rotate({} {} {})""#,
        num(angle),
        num(mid.x),
        num(mid.y)
    );
    // First label sits above the line, a second one below it.
    let offsets = [-3.0, font.size + 1.0];
    for (label, dy) in labels.iter().zip(offsets) {
        builder.add_text(
            Layer::ConnectionLabels,
            &["connection-label"],
            label,
            Point::new(mid.x, mid.y + dy),
            "middle",
            font,
            &rotate,
        );
    }
}

fn render_custom_labels(builder: &mut SvgBuilder) {
    let config = builder.config;
    for label in &config.custom_labels {
        let font = FontStyle {
            size: label.font_size,
            color: label.font_color.clone(),
            family: label.font_family.clone(),
            bold: label.bold,
        };
        let at = Point::new(label.x, label.y);
        if label.background {
            let w = estimate_width(&label.text, label.font_size) + 8.0;
            let h = line_height(label.font_size) + 4.0;
            let styles = format!(
                r#" fill="{}" stroke="{}" stroke-width="{}""#,
                escape_xml(&label.background_color),
                escape_xml(&label.border_color),
                num(label.border_width)
            );
            builder.add_box(
                Layer::CustomLabels,
                &["custom-label-box"],
                at.x - w / 2.0,
                at.y - h / 2.0,
                w,
                h,
                &styles,
            );
        }
        builder.add_text(
            Layer::CustomLabels,
            &["custom-label"],
            &label.text,
            at,
            "middle",
            &font,
            r#" dominant-baseline="middle""#,
        );
    }
}

fn render_room_text(room: &Room, center: Point, builder: &mut SvgBuilder) {
    let config = builder.config;
    let font = &config.fonts.rooms;

    if config.display.show_room_ids {
        builder.add_text(
            Layer::RoomText,
            &["room-id"],
            &room.id.to_string(),
            center,
            "middle",
            font,
            r#" dominant-baseline="middle""#,
        );
    }

    if config.display.show_room_names {
        let Some(name) = room_name(room) else {
            return;
        };
        let (_, hh) = room_extent(config.room_shape, config.room_size);
        let mut y = center.y + hh + font.size;
        for line in wrap(&name, config.name_wrap_width) {
            builder.add_text(
                Layer::RoomText,
                &["room-name"],
                &line,
                Point::new(center.x, y),
                "middle",
                font,
                "",
            );
            y += line_height(font.size);
        }
    }
}

fn font_attrs(font: &FontStyle) -> String {
    let weight = if font.bold {
        r#" font-weight="bold""#
    } else {
        ""
    };
    format!(
        r#" font-family="{}" font-size="{}" fill="{}"{}"#,
        escape_xml(&font.family),
        num(font.size),
        escape_xml(&font.color),
        weight
    )
}

/// Format a coordinate with at most two decimals
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
