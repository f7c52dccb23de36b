//! Auto-arrange into functional zones.
//!
//! ```text
//!        tops            table row              tops
//!   [T][T]   [P][P] [HUB][HUB] [P][P]   [T][T]   [other]
//!        subs            floor row              subs
//! ```
//!
//! Positions only. Cables are left exactly as they were.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, DeviceCategory, DeviceDefinition};
use crate::config::{LayoutConfig, ViewConfig};
use crate::routing::Face;
use crate::session::PlacedItem;

/// Scale and pan that fit every item inside the viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ViewFit {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrangeResult {
    pub items: Vec<PlacedItem>,
    /// `None` when nothing could be measured.
    pub view: Option<ViewFit>,
}

#[derive(Default)]
struct Zones {
    hubs: Vec<usize>,
    players: Vec<usize>,
    tops: Vec<usize>,
    subs: Vec<usize>,
    others: Vec<usize>,
}

fn classify(items: &[PlacedItem], catalog: &Catalog) -> Zones {
    let mut zones = Zones::default();
    for (idx, item) in items.iter().enumerate() {
        let Some(def) = catalog.get(&item.device_id) else { continue };
        match def.category {
            c if c.is_hub_like() => zones.hubs.push(idx),
            DeviceCategory::Player => zones.players.push(idx),
            DeviceCategory::Speaker if def.is_subwoofer() => zones.subs.push(idx),
            DeviceCategory::Speaker => zones.tops.push(idx),
            _ => zones.others.push(idx),
        }
    }
    zones
}

/// Rewrite item positions into zones and compute a fitting view.
pub fn auto_arrange(
    items: &[PlacedItem],
    catalog: &Catalog,
    face: Face,
    layout: &LayoutConfig,
    view: &ViewConfig,
) -> ArrangeResult {
    let mut arranged = items.to_vec();
    if items.is_empty() {
        return ArrangeResult { items: arranged, view: None };
    }

    let zones = classify(items, catalog);
    let width = |idx: usize| catalog.get(&items[idx].device_id).map_or(0.0, |d| d.width);
    let mut place = |idx: usize, x: f64, y: f64| {
        arranged[idx].x = x;
        arranged[idx].y = y;
    };

    let mut left = layout.center_x;
    let mut right = layout.center_x;

    if let Some((&main, rest)) = zones.hubs.split_first() {
        let start = layout.center_x - width(main) / 2.0;
        place(main, start, layout.table_y);
        left = start - layout.spacing;
        right = start + width(main) + layout.spacing;
        for &idx in rest {
            place(idx, right, layout.table_y);
            right += width(idx) + layout.spacing;
        }
    }

    for (n, &idx) in zones.players.iter().enumerate() {
        if n % 2 == 0 {
            let x = left - width(idx);
            place(idx, x, layout.table_y);
            left = x - layout.spacing;
        } else {
            place(idx, right, layout.table_y);
            right += width(idx) + layout.spacing;
        }
    }

    let wing = |group: &[usize], y: f64, gap: f64, place: &mut dyn FnMut(usize, f64, f64)| -> f64 {
        let split = (group.len() + 1) / 2;
        let mut outer_left = left - layout.pa_offset;
        let mut outer_right = right + layout.pa_offset;
        for &idx in &group[..split] {
            let x = outer_left - width(idx);
            place(idx, x, y);
            outer_left = x - gap;
        }
        for &idx in &group[split..] {
            place(idx, outer_right, y);
            outer_right += width(idx) + gap;
        }
        outer_right
    };

    wing(&zones.tops, layout.table_y - layout.top_lift, layout.spacing, &mut place);
    let sub_right = wing(&zones.subs, layout.floor_y, layout.sub_spacing, &mut place);

    let mut other_x = sub_right + layout.other_gap;
    for &idx in &zones.others {
        place(idx, other_x, layout.table_y);
        other_x += width(idx) + layout.spacing;
    }

    debug!(
        hubs = zones.hubs.len(),
        players = zones.players.len(),
        tops = zones.tops.len(),
        subs = zones.subs.len(),
        others = zones.others.len(),
        "auto-arranged"
    );

    let fit = fit_view(&arranged, catalog, face, view);
    ArrangeResult { items: arranged, view: fit }
}

fn face_height(def: &DeviceDefinition, face: Face) -> f64 {
    match face {
        Face::Back => def.rear_height(),
        Face::Front => def.height,
    }
}

/// Scale and pan that center the bounding box of all known items.
pub fn fit_view(items: &[PlacedItem], catalog: &Catalog, face: Face, view: &ViewConfig) -> Option<ViewFit> {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

    for item in items {
        let Some(def) = catalog.get(&item.device_id) else { continue };
        min_x = min_x.min(item.x);
        min_y = min_y.min(item.y);
        max_x = max_x.max(item.x + def.width);
        max_y = max_y.max(item.y + face_height(def, face));
    }

    let content_w = max_x - min_x + view.padding * 2.0;
    let content_h = max_y - min_y + view.padding * 2.0;
    if !(content_w > 0.0 && content_h > 0.0) || !content_w.is_finite() || !content_h.is_finite() {
        return None;
    }

    let [viewport_w, viewport_h] = view.viewport;
    let scale = (viewport_w / content_w)
        .min(viewport_h / content_h)
        .clamp(view.min_scale, view.max_scale);

    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;

    Some(ViewFit {
        scale,
        pan_x: viewport_w / 2.0 - center_x * scale,
        pan_y: viewport_h / 2.0 - center_y * scale,
    })
}
