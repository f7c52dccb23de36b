//! Topology Inference - Roles In, Cable Graph Out
//!
//! Roles are resolved from device categories and item order:
//! - hub: first mixer/all-in-one/controller in list order
//! - players and speakers: sorted by x, which fixes channel order
//! - power strip: recognized by device id
//!
//! Every failed lookup drops that one cable and records an [`Omission`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::catalog::{Catalog, DeviceCategory, DeviceDefinition, PortKind};
use crate::config::CablingConfig;
use crate::equipment::{TRAKTOR_S4_ID, XDJ_RX3_ID, XDJ_XZ_ID};
use crate::hashing::cable_id;
use crate::outcome::{Omission, OmissionKind, Outcome};
use crate::session::PlacedItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CableKind {
    Power,
    Audio,
    Data,
    Ground,
}

impl CableKind {
    /// Lane order used when routing: power, audio, data, ground.
    pub fn lane_rank(self) -> u8 {
        match self {
            Self::Power => 0,
            Self::Audio => 1,
            Self::Data => 2,
            Self::Ground => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Audio => "audio",
            Self::Data => "data",
            Self::Ground => "ground",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub instance_id: String,
    pub port_id: String,
}

impl Endpoint {
    pub fn new(instance_id: &str, port_id: &str) -> Self {
        Self { instance_id: instance_id.to_string(), port_id: port_id.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cable {
    pub id: String,
    pub from: Endpoint,
    /// `None` terminates at an unmanaged sink (mains, snake, floor run).
    #[serde(default)]
    pub to: Option<Endpoint>,
    pub kind: CableKind,
}

impl Cable {
    pub fn is_dangling(&self) -> bool {
        self.to.is_none()
    }
}

/// Per-hub-model input slots, keyed by device id.
///
/// Hubs without an entry fall back to channel-label matching when they are
/// plain mixers; anything else is unmapped.
#[derive(Debug, Clone, Default)]
pub struct HubPortMap {
    slots: HashMap<String, Vec<String>>,
}

impl HubPortMap {
    pub fn new() -> Self {
        Self { slots: HashMap::new() }
    }

    pub fn stock() -> Self {
        let mut map = Self::new();
        map.insert(XDJ_XZ_ID, &["rca-in-3", "rca-in-4"]);
        map.insert(TRAKTOR_S4_ID, &["rca-in-1", "rca-in-2", "rca-in-3", "rca-in-4"]);
        map.insert(XDJ_RX3_ID, &["rca-in-1", "rca-in-2"]);
        map
    }

    pub fn insert(&mut self, device_id: &str, inputs: &[&str]) {
        self.slots.insert(device_id.to_string(), inputs.iter().map(|s| s.to_string()).collect());
    }

    pub fn slots_for(&self, device_id: &str) -> Option<&[String]> {
        self.slots.get(device_id).map(Vec::as_slice)
    }

    /// Hub input port for the player at `index` (0-based, x-sorted).
    pub fn resolve(&self, hub: &DeviceDefinition, index: usize) -> Result<String, (OmissionKind, String)> {
        let port_id = if let Some(slots) = self.slots_for(&hub.id) {
            slots.get(index).cloned().ok_or_else(|| {
                (OmissionKind::CapacityExceeded, format!("{} maps {} inputs, source #{} has none", hub.id, slots.len(), index + 1))
            })?
        } else if hub.category == DeviceCategory::Mixer {
            let channel = format!("CH{}", index + 1);
            hub.back_ports
                .iter()
                .find(|p| p.kind == PortKind::Rca && p.label_contains(&channel))
                .map(|p| p.id.clone())
                .ok_or_else(|| (OmissionKind::CapacityExceeded, format!("{} has no {} input", hub.id, channel)))?
        } else {
            return Err((OmissionKind::UnmappedHubModel, format!("no input table for {}", hub.id)));
        };

        if hub.find_port(&port_id).is_none() {
            return Err((OmissionKind::MissingPort, format!("{} lacks mapped input {}", hub.id, port_id)));
        }
        Ok(port_id)
    }
}

/// Accumulates cables in emission order and assigns deterministic ids.
struct CableBuilder {
    cables: Vec<Cable>,
    omissions: Vec<Omission>,
}

impl CableBuilder {
    fn new() -> Self {
        Self { cables: Vec::new(), omissions: Vec::new() }
    }

    fn add(&mut self, from: &PlacedItem, from_port: &str, kind: CableKind, to: Option<(&PlacedItem, &str)>) {
        let from = Endpoint::new(&from.instance_id, from_port);
        let to = to.map(|(item, port)| Endpoint::new(&item.instance_id, port));
        let id = cable_id(self.cables.len(), &(&from, &to, kind));
        debug!(cable = %id, kind = kind.as_str(), from = ?from, to = ?to, "cable");
        self.cables.push(Cable { id, from, to, kind });
    }

    fn omit(&mut self, kind: OmissionKind, instance_id: &str, detail: impl Into<String>) {
        let omission = Omission::new(kind, instance_id, detail);
        debug!(%omission, "omitted");
        self.omissions.push(omission);
    }

    fn finish(self) -> Outcome<Vec<Cable>> {
        let outcome = Outcome::new(self.cables, self.omissions);
        if !outcome.is_complete() {
            warn!(count = outcome.omissions.len(), "topology completed with omissions");
        }
        outcome
    }
}

/// Item paired with its resolved definition.
type Resolved<'a> = (&'a PlacedItem, &'a DeviceDefinition);

/// The topology engine - configuration plus hub table
#[derive(Debug, Clone, Default)]
pub struct TopologyEngine {
    pub cabling: CablingConfig,
    pub hubs: HubPortMap,
}

impl TopologyEngine {
    pub fn new(cabling: CablingConfig, hubs: HubPortMap) -> Self {
        Self { cabling, hubs }
    }

    pub fn stock() -> Self {
        Self::new(CablingConfig::default(), HubPortMap::stock())
    }

    /// Infer the full cable list for `items`.
    pub fn generate(&self, items: &[PlacedItem], catalog: &Catalog) -> Outcome<Vec<Cable>> {
        let mut out = CableBuilder::new();

        let mut resolved: Vec<Resolved> = Vec::with_capacity(items.len());
        for item in items {
            match catalog.get(&item.device_id) {
                Some(def) => resolved.push((item, def)),
                None => out.omit(OmissionKind::MissingDefinition, &item.instance_id, format!("unknown device {}", item.device_id)),
            }
        }

        let hub = resolved.iter().copied().find(|(_, d)| d.category.is_hub_like());
        let players = sorted_by_x(resolved.iter().copied().filter(|(_, d)| d.category == DeviceCategory::Player));
        let speakers = sorted_by_x(resolved.iter().copied().filter(|(_, d)| d.category == DeviceCategory::Speaker));

        self.wire_power(&resolved, &mut out);

        if let Some(hub) = hub {
            self.wire_sources(hub, &players, &mut out);
            wire_pa(hub, &speakers, &mut out);

            let (hub_item, hub_def) = hub;
            if hub_def.category == DeviceCategory::Controller {
                match hub_def.usb_port() {
                    Some(usb) => out.add(hub_item, &usb.id, CableKind::Data, None),
                    None => out.omit(OmissionKind::MissingPort, &hub_item.instance_id, "controller has no USB port"),
                }
            }
        }

        out.finish()
    }

    fn wire_power(&self, resolved: &[Resolved], out: &mut CableBuilder) {
        let strip = resolved.iter().find(|(i, _)| i.device_id == self.cabling.strip_device_id);
        let mut used = 0;

        for &(item, def) in resolved {
            if item.device_id == self.cabling.strip_device_id {
                continue;
            }
            let Some(inlet) = def.power_inlet() else { continue };

            match strip {
                Some(&(strip_item, _)) if used < self.cabling.strip_capacity => {
                    used += 1;
                    let outlet = format!("{}{}", self.cabling.strip_outlet_prefix, used);
                    out.add(item, &inlet.id, CableKind::Power, Some((strip_item, outlet.as_str())));
                }
                _ => out.add(item, &inlet.id, CableKind::Power, None),
            }
        }

        if let Some(&(strip_item, _)) = strip {
            out.add(strip_item, &self.cabling.strip_inlet_port, CableKind::Power, None);
        }
    }

    fn wire_sources(&self, hub: Resolved, players: &[Resolved], out: &mut CableBuilder) {
        let (hub_item, hub_def) = hub;

        for (idx, &(player, def)) in players.iter().enumerate() {
            let output = def.audio_output();
            if output.is_none() {
                out.omit(OmissionKind::MissingPort, &player.instance_id, format!("{} has no audio output", def.id));
            }

            let input = match self.hubs.resolve(hub_def, idx) {
                Ok(port) => Some(port),
                Err((kind, detail)) => {
                    out.omit(kind, &player.instance_id, detail);
                    None
                }
            };

            if let (Some(output), Some(input)) = (output, input) {
                out.add(player, &output.id, CableKind::Audio, Some((hub_item, input.as_str())));
            }

            if def.is_turntable() {
                match def.ground_terminal() {
                    Some(gnd) => out.add(player, &gnd.id, CableKind::Ground, None),
                    None => out.omit(OmissionKind::MissingPort, &player.instance_id, "turntable has no ground terminal"),
                }
            }
        }
    }
}

fn wire_pa(hub: Resolved, speakers: &[Resolved], out: &mut CableBuilder) {
    let (hub_item, hub_def) = hub;
    let (master_l, master_r) = hub_def.master_outputs();
    if master_l.is_none() || master_r.is_none() {
        out.omit(OmissionKind::MissingPort, &hub_item.instance_id, format!("{} lacks a master L/R pair", hub_def.id));
    }

    let subs: Vec<Resolved> = speakers.iter().copied().filter(|(_, d)| d.is_subwoofer()).collect();
    let tops: Vec<Resolved> = speakers.iter().copied().filter(|(_, d)| !d.is_subwoofer()).collect();

    // Destination port must exist on the target before a cable is drawn to it.
    let link = |from: &PlacedItem, from_port: &str, to: Resolved, to_port: &str, out: &mut CableBuilder| {
        let (to_item, to_def) = to;
        if to_def.find_port(to_port).is_some() {
            out.add(from, from_port, CableKind::Audio, Some((to_item, to_port)));
        } else {
            out.omit(OmissionKind::MissingPort, &to_item.instance_id, format!("{} lacks {}", to_def.id, to_port));
        }
    };

    if !subs.is_empty() {
        for (i, &sub) in subs.iter().enumerate() {
            if i % 2 == 0 {
                if let Some(l) = master_l {
                    link(hub_item, &l.id, sub, "xlr-in-l", out);
                }
            }
            if i % 2 == 1 || subs.len() == 1 {
                if let Some(r) = master_r {
                    link(hub_item, &r.id, sub, "xlr-in-r", out);
                }
            }
        }

        for (i, &top) in tops.iter().enumerate() {
            let (sub_item, sub_def) = subs[i % subs.len()];
            let through = if i % 2 == 0 { "xlr-out-l" } else { "xlr-out-r" };
            if sub_def.find_port(through).is_some() {
                link(sub_item, through, top, "xlr-in-1", out);
            } else {
                out.omit(OmissionKind::MissingPort, &sub_item.instance_id, format!("{} lacks {}", sub_def.id, through));
            }
        }
    } else {
        for (i, &top) in tops.iter().enumerate() {
            let master = if i % 2 == 0 { master_l } else { master_r };
            if let Some(m) = master {
                link(hub_item, &m.id, top, "xlr-in-1", out);
            }
        }
    }

    // House handoff so the manifest still counts the master pair.
    if speakers.is_empty() {
        for master in [master_l, master_r].into_iter().flatten() {
            out.add(hub_item, &master.id, CableKind::Audio, None);
        }
    }
}

fn sorted_by_x<'a>(items: impl Iterator<Item = Resolved<'a>>) -> Vec<Resolved<'a>> {
    let mut v: Vec<_> = items.collect();
    v.sort_by(|a, b| a.0.x.total_cmp(&b.0.x));
    v
}

/// Infer cables with the stock hub table and cabling defaults.
pub fn generate_cables(items: &[PlacedItem], catalog: &Catalog) -> Outcome<Vec<Cable>> {
    TopologyEngine::stock().generate(items, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, device: &str, x: f64) -> PlacedItem {
        PlacedItem::new(id, device, x, 0.0)
    }

    fn to_of(c: &Cable) -> Option<(&str, &str)> {
        c.to.as_ref().map(|e| (e.instance_id.as_str(), e.port_id.as_str()))
    }

    fn audio(cables: &[Cable]) -> Vec<&Cable> {
        cables.iter().filter(|c| c.kind == CableKind::Audio).collect()
    }

    #[test]
    fn test_players_follow_x_order() {
        let catalog = Catalog::builtin();
        let items = vec![
            item("right", "cdj-3000", 900.0),
            item("mixer", "djm-900", 500.0),
            item("left", "cdj-3000", 100.0),
        ];
        let cables = generate_cables(&items, &catalog).output;
        let audio = audio(&cables);
        assert_eq!(audio[0].from.instance_id, "left");
        assert_eq!(to_of(audio[0]), Some(("mixer", "rca-in-1")));
        assert_eq!(audio[1].from.instance_id, "right");
        assert_eq!(to_of(audio[1]), Some(("mixer", "rca-in-2")));
    }

    #[test]
    fn test_first_hub_in_list_order_wins() {
        let catalog = Catalog::builtin();
        let items = vec![
            item("rx3", "xdj-rx3", 800.0),
            item("mixer", "djm-900", 100.0),
            item("deck", "cdj-3000", 0.0),
        ];
        let cables = generate_cables(&items, &catalog).output;
        let src = audio(&cables).into_iter().find(|c| c.from.instance_id == "deck").unwrap();
        assert_eq!(to_of(src), Some(("rx3", "rca-in-1")));
    }

    #[test]
    fn test_xz_only_takes_two_players() {
        let catalog = Catalog::builtin();
        let items = vec![
            item("xz", "xdj-xz", 500.0),
            item("a", "cdj-3000", 0.0),
            item("b", "cdj-3000", 100.0),
            item("c", "cdj-3000", 200.0),
        ];
        let outcome = generate_cables(&items, &catalog);
        let inputs: Vec<_> = audio(&outcome.output)
            .into_iter()
            .filter_map(|c| to_of(c).map(|(_, p)| p))
            .collect();
        assert_eq!(inputs, vec!["rca-in-3", "rca-in-4"]);
        assert_eq!(outcome.count(OmissionKind::CapacityExceeded), 1);
    }

    #[test]
    fn test_unmapped_hub_still_powers_and_feeds_pa() {
        let mut catalog = Catalog::builtin();
        let mut custom = catalog.get("xdj-rx3").unwrap().clone();
        custom.id = "mystery-aio".to_string();
        catalog.register(custom);

        let items = vec![item("hub", "mystery-aio", 0.0), item("deck", "cdj-3000", 100.0)];
        let outcome = generate_cables(&items, &catalog);
        assert_eq!(outcome.count(OmissionKind::UnmappedHubModel), 1);
        assert!(outcome.output.iter().any(|c| c.kind == CableKind::Power));
        // no speakers: master pair handed off to the house
        assert_eq!(audio(&outcome.output).len(), 2);
        assert!(audio(&outcome.output).iter().all(|c| c.is_dangling()));
    }

    #[test]
    fn test_turntable_grounds_to_sink() {
        let catalog = Catalog::builtin();
        let items = vec![item("mixer", "djm-900", 0.0), item("tt", "sl-1200", 100.0)];
        let cables = generate_cables(&items, &catalog).output;
        let ground: Vec<_> = cables.iter().filter(|c| c.kind == CableKind::Ground).collect();
        assert_eq!(ground.len(), 1);
        assert_eq!(ground[0].from.port_id, "gnd");
        assert!(ground[0].is_dangling());
    }

    #[test]
    fn test_lone_sub_takes_both_sides() {
        let catalog = Catalog::builtin();
        let items = vec![item("mixer", "djm-900", 0.0), item("sub", "qsc-ks118", 100.0)];
        let cables = generate_cables(&items, &catalog).output;
        let feeds: Vec<_> = audio(&cables).into_iter().filter_map(to_of).collect();
        assert_eq!(feeds, vec![("sub", "xlr-in-l"), ("sub", "xlr-in-r")]);
    }

    #[test]
    fn test_tops_direct_split_by_parity() {
        let catalog = Catalog::builtin();
        let items = vec![
            item("mixer", "djm-900", 500.0),
            item("top-r", "qsc-k12-2", 900.0),
            item("top-l", "qsc-k12-2", 0.0),
        ];
        let cables = generate_cables(&items, &catalog).output;
        let a = audio(&cables);
        assert_eq!(a[0].from.port_id, "xlr-out-l");
        assert_eq!(to_of(a[0]), Some(("top-l", "xlr-in-1")));
        assert_eq!(a[1].from.port_id, "xlr-out-r");
        assert_eq!(to_of(a[1]), Some(("top-r", "xlr-in-1")));
    }

    #[test]
    fn test_controller_usb_to_host() {
        let catalog = Catalog::builtin();
        let items = vec![item("s4", "traktor-s4", 0.0)];
        let cables = generate_cables(&items, &catalog).output;
        let data: Vec<_> = cables.iter().filter(|c| c.kind == CableKind::Data).collect();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].from.port_id, "usb");
        assert!(data[0].is_dangling());
    }

    #[test]
    fn test_unknown_device_is_dropped() {
        let catalog = Catalog::builtin();
        let items = vec![item("ghost", "does-not-exist", 0.0), item("deck", "cdj-3000", 0.0)];
        let outcome = generate_cables(&items, &catalog);
        assert_eq!(outcome.count(OmissionKind::MissingDefinition), 1);
        assert!(outcome.output.iter().all(|c| c.from.instance_id != "ghost"));
        assert_eq!(outcome.output.len(), 1);
    }

    #[test]
    fn test_cable_ids_unique_and_reproducible() {
        let catalog = Catalog::builtin();
        let items = vec![
            item("mixer", "djm-900", 0.0),
            item("a", "cdj-3000", 100.0),
            item("b", "cdj-3000", 200.0),
        ];
        let first = generate_cables(&items, &catalog).output;
        let second = generate_cables(&items, &catalog).output;
        assert_eq!(first, second);
        let mut ids: Vec<_> = first.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), first.len());
    }

    #[test]
    fn test_custom_hub_table_entry() {
        let mut catalog = Catalog::builtin();
        let mut custom = catalog.get("xdj-rx3").unwrap().clone();
        custom.id = "rx-custom".to_string();
        catalog.register(custom);

        let mut hubs = HubPortMap::stock();
        hubs.insert("rx-custom", &["rca-in-2"]);
        let engine = TopologyEngine::new(CablingConfig::default(), hubs);

        let items = vec![item("hub", "rx-custom", 0.0), item("deck", "cdj-3000", 100.0)];
        let cables = engine.generate(&items, &catalog).output;
        let src = cables.iter().find(|c| c.from.instance_id == "deck" && c.kind == CableKind::Audio).unwrap();
        assert_eq!(to_of(src), Some(("hub", "rca-in-2")));
    }
}
