//! Cable routing (rectilinear paths with shared lanes).
//!
//! Cables drop below the lower of their two ports, run horizontally in one of
//! a fixed set of parallel lanes, then rise into the destination. The lane is
//! picked from the cable's position in a category-sorted list, so callers must
//! pass a stable order for lanes to stay separated.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DeviceDefinition, Port};
use crate::config::RoutingConfig;
use crate::session::PlacedItem;
use crate::topology::{Cable, CableKind};

/// Which panel of every device is facing the viewer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    pub fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo { to: Point },
    LineTo { to: Point },
    /// Quadratic curve used for the rounded corners.
    QuadTo { control: Point, to: Point },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CablePath {
    pub segments: Vec<PathSegment>,
    pub label: Point,
    pub vertical: bool,
}

impl CablePath {
    /// SVG path data (`M`, `L`, `Q` commands).
    pub fn to_svg(&self) -> String {
        self.segments
            .iter()
            .map(|seg| match seg {
                PathSegment::MoveTo { to } => format!("M {} {}", to.x, to.y),
                PathSegment::LineTo { to } => format!("L {} {}", to.x, to.y),
                PathSegment::QuadTo { control, to } => format!("Q {} {} {} {}", control.x, control.y, to.x, to.y),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn end(&self) -> Option<Point> {
        self.segments.last().map(|s| match *s {
            PathSegment::MoveTo { to } | PathSegment::LineTo { to } | PathSegment::QuadTo { to, .. } => to,
        })
    }
}

/// Route one cable from `start` to `end` in lane `lane_index`.
pub fn route_path(start: Point, end: Point, lane_index: usize, cfg: &RoutingConfig) -> CablePath {
    let dx = end.x - start.x;

    if dx.abs() < cfg.vertical_tolerance && end.y > start.y + cfg.vertical_min_drop {
        return CablePath {
            segments: vec![PathSegment::MoveTo { to: start }, PathSegment::LineTo { to: Point::new(start.x, end.y) }],
            label: Point::new(start.x + 8.0, start.y + 80.0),
            vertical: true,
        };
    }

    let lane = lane_index % cfg.lane_count.max(1);
    let channel_y = start.y.max(end.y) + cfg.base_clearance + lane as f64 * cfg.lane_height;
    let label = Point::new((start.x + end.x) / 2.0, channel_y);
    let r = cfg.corner_radius;

    if dx.abs() < r * 2.0 {
        return CablePath {
            segments: vec![
                PathSegment::MoveTo { to: start },
                PathSegment::LineTo { to: Point::new(start.x, channel_y) },
                PathSegment::LineTo { to: Point::new(end.x, channel_y) },
                PathSegment::LineTo { to: end },
            ],
            label,
            vertical: false,
        };
    }

    let dir = if end.x > start.x { 1.0 } else { -1.0 };
    CablePath {
        segments: vec![
            PathSegment::MoveTo { to: start },
            PathSegment::LineTo { to: Point::new(start.x, channel_y - r) },
            PathSegment::QuadTo { control: Point::new(start.x, channel_y), to: Point::new(start.x + r * dir, channel_y) },
            PathSegment::LineTo { to: Point::new(end.x - r * dir, channel_y) },
            PathSegment::QuadTo { control: Point::new(end.x, channel_y), to: Point::new(end.x, channel_y - r) },
            PathSegment::LineTo { to: end },
        ],
        label,
        vertical: false,
    }
}

/// [`route_path`] with the stock routing constants.
pub fn calculate_cable_geometry(start: Point, end: Point, lane_index: usize) -> CablePath {
    route_path(start, end, lane_index, &RoutingConfig::default())
}

/// Absolute position of a port for the given face.
#[derive(Debug, Clone, Copy)]
pub struct PortAnchor<'a> {
    pub point: Point,
    /// True when the port sits on the back panel.
    pub on_back: bool,
    pub port: Option<&'a Port>,
}

/// Resolve where a port is drawn.
///
/// Ports on the hidden face snap to the device's top edge.
pub fn port_anchor<'a>(item: &PlacedItem, def: &'a DeviceDefinition, port_id: &str, face: Face) -> PortAnchor<'a> {
    if let Some(port) = def.back_ports.iter().find(|p| p.id == port_id) {
        let y = if face == Face::Back { item.y + port.y } else { item.y };
        return PortAnchor { point: Point::new(item.x + port.x, y), on_back: true, port: Some(port) };
    }
    if let Some(port) = def.front_ports.iter().find(|p| p.id == port_id) {
        let y = if face == Face::Front { item.y + port.y } else { item.y };
        return PortAnchor { point: Point::new(item.x + port.x, y), on_back: false, port: Some(port) };
    }
    PortAnchor { point: Point::new(item.x, item.y), on_back: false, port: None }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutedCable {
    pub cable_id: String,
    pub kind: CableKind,
    pub lane: usize,
    pub path: CablePath,
    /// Drawn dashed: an end sits on the hidden face, or the cable runs to
    /// the house.
    pub phantom: bool,
}

/// Stable sort by lane rank: power, audio, data, ground.
pub fn sort_for_lanes(cables: &[Cable]) -> Vec<&Cable> {
    let mut sorted: Vec<&Cable> = cables.iter().collect();
    sorted.sort_by_key(|c| c.kind.lane_rank());
    sorted
}

/// Route every cable whose origin can be placed.
///
/// Lane indices follow the sorted position even when a cable is skipped, so
/// removing one item does not shuffle the remaining lanes.
pub fn route_cables(
    items: &[PlacedItem],
    cables: &[Cable],
    catalog: &Catalog,
    face: Face,
    cfg: &RoutingConfig,
) -> Vec<RoutedCable> {
    let hidden = |a: &PortAnchor| a.port.is_some() && a.on_back != (face == Face::Back);
    let locate = |instance_id: &str| {
        items
            .iter()
            .find(|i| i.instance_id == instance_id)
            .and_then(|i| catalog.get(&i.device_id).map(|d| (i, d)))
    };

    sort_for_lanes(cables)
        .into_iter()
        .enumerate()
        .filter_map(|(lane, cable)| {
            let (from_item, from_def) = locate(&cable.from.instance_id)?;
            let start = port_anchor(from_item, from_def, &cable.from.port_id, face);

            let end = cable
                .to
                .as_ref()
                .and_then(|to| locate(&to.instance_id).map(|(item, def)| port_anchor(item, def, &to.port_id, face)));
            let end_point = end
                .as_ref()
                .map_or(Point::new(start.point.x, start.point.y + cfg.dangling_drop), |e| e.point);

            Some(RoutedCable {
                cable_id: cable.id.clone(),
                kind: cable.kind,
                lane,
                path: route_path(start.point, end_point, lane, cfg),
                phantom: hidden(&start) || end.as_ref().map_or(true, |e| hidden(e)),
            })
        })
        .collect()
}
