//! Patch sheet and equipment list for the sound check.
//!
//! Each row says which cable end to bring to which socket.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DeviceCategory, Port, PortKind};
use crate::session::PlacedItem;
use crate::topology::{Cable, CableKind, Endpoint};

pub const HOUSE_SINK: &str = "House / Floor";

/// Connector gender, for both panel sockets and cable plugs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

/// The plug a cable needs at one end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plug {
    pub gender: Gender,
    pub label: String,
}

impl Plug {
    fn new(gender: Gender, label: &str) -> Self {
        Self { gender, label: label.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchEnd {
    pub model: String,
    pub port: String,
    /// Gender of the panel socket.
    pub socket: Gender,
    /// Plug on the cable end that goes into that socket.
    pub plug: Plug,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchRow {
    pub cable_id: String,
    pub kind: CableKind,
    pub from: PatchEnd,
    pub to: PatchEnd,
    /// The far end runs to the house system rather than a placed device.
    pub to_house: bool,
    /// Destination socket and cable plug have the same gender.
    pub mismatch: bool,
}

impl PatchRow {
    pub fn destination_label(&self) -> String {
        if self.to_house {
            HOUSE_SINK.to_string()
        } else {
            format!("{} / {}", self.to.model, self.to.port)
        }
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Socket gender inferred from connector kind and panel label.
///
/// Labels are matched word by word, so "MAIN" never reads as "IN".
/// Unlabeled power ports are outlets only when they are numbered.
pub fn socket_gender(port: Option<&Port>) -> Gender {
    let Some(port) = port else { return Gender::Neutral };
    let label = words(port.label.as_deref().unwrap_or_default());
    let has = |list: &[&str]| label.iter().any(|w| list.contains(&w.as_str()));

    match port.kind {
        PortKind::Xlr if has(&["IN", "RETURN", "MIC"]) => Gender::Female,
        PortKind::Xlr => Gender::Male,
        PortKind::Rca => Gender::Female,
        PortKind::Power if has(&["IN", "MAINS", "AC"]) => Gender::Male,
        PortKind::Power if port.label.is_none() => {
            let numbered = words(&port.id).last().map_or(false, |w| w.chars().all(|c| c.is_ascii_digit()));
            if numbered { Gender::Female } else { Gender::Male }
        }
        PortKind::Power => Gender::Female,
        _ => Gender::Neutral,
    }
}

/// Plugs needed at the origin and destination ends of a cable.
pub fn cable_plugs(kind: CableKind, from: Option<&Port>, to: Option<&Port>) -> (Plug, Plug) {
    let is_rca = |p: Option<&Port>| p.map_or(false, |p| p.kind == PortKind::Rca);
    match kind {
        CableKind::Audio => {
            let start = if is_rca(from) { Plug::new(Gender::Male, "RCA MALE") } else { Plug::new(Gender::Female, "XLR FEMALE") };
            let end = if is_rca(to) { Plug::new(Gender::Male, "RCA MALE") } else { Plug::new(Gender::Male, "XLR MALE") };
            (start, end)
        }
        CableKind::Power => (Plug::new(Gender::Female, "IEC C13"), Plug::new(Gender::Male, "MAINS PLUG")),
        CableKind::Data => (Plug::new(Gender::Male, "USB B"), Plug::new(Gender::Male, "USB A")),
        CableKind::Ground => (Plug::new(Gender::Neutral, "SPADE LUG"), Plug::new(Gender::Neutral, "SPADE LUG")),
    }
}

struct Located<'a> {
    model: String,
    port_name: String,
    port: Option<&'a Port>,
}

fn locate<'a>(items: &[PlacedItem], catalog: &'a Catalog, end: &Endpoint) -> Located<'a> {
    let item = items.iter().find(|i| i.instance_id == end.instance_id);
    let def = item.and_then(|i| catalog.get(&i.device_id));
    let port = def.and_then(|d| d.find_port(&end.port_id));

    let model = match (item, def) {
        (None, _) => "Unknown Device".to_string(),
        (Some(_), None) => "Unknown Model".to_string(),
        (Some(_), Some(d)) => d.model.clone(),
    };

    Located {
        model,
        port_name: port.map_or(end.port_id.clone(), |p| p.display_name().to_string()),
        port,
    }
}

fn patch_row(items: &[PlacedItem], catalog: &Catalog, cable: &Cable) -> PatchRow {
    let from = locate(items, catalog, &cable.from);
    let to = cable.to.as_ref().map(|end| locate(items, catalog, end));
    let (start_plug, end_plug) = cable_plugs(cable.kind, from.port, to.as_ref().and_then(|t| t.port));

    let to_socket = to.as_ref().map_or(Gender::Neutral, |t| socket_gender(t.port));
    let mismatch = to_socket != Gender::Neutral && to_socket == end_plug.gender;

    let to_end = match to {
        Some(t) => PatchEnd { model: t.model, port: t.port_name, socket: to_socket, plug: end_plug },
        None => PatchEnd { model: HOUSE_SINK.to_string(), port: "Stage Box".to_string(), socket: to_socket, plug: end_plug },
    };

    PatchRow {
        cable_id: cable.id.clone(),
        kind: cable.kind,
        from: PatchEnd { socket: socket_gender(from.port), model: from.model, port: from.port_name, plug: start_plug },
        to_house: cable.to.is_none(),
        to: to_end,
        mismatch,
    }
}

/// One row per cable, grouped by kind then origin instance.
pub fn patch_sheet(items: &[PlacedItem], cables: &[Cable], catalog: &Catalog) -> Vec<PatchRow> {
    let mut sorted: Vec<&Cable> = cables.iter().collect();
    sorted.sort_by(|a, b| {
        a.kind
            .as_str()
            .cmp(b.kind.as_str())
            .then_with(|| a.from.instance_id.cmp(&b.from.instance_id))
    });

    sorted.into_iter().map(|c| patch_row(items, catalog, c)).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentLine {
    pub manufacturer: String,
    pub model: String,
    pub category: DeviceCategory,
    pub count: usize,
}

/// Per-definition counts, sorted by category then model.
pub fn equipment_list(items: &[PlacedItem], catalog: &Catalog) -> Vec<EquipmentLine> {
    let mut lines: Vec<(String, EquipmentLine)> = Vec::new();
    for item in items {
        let Some(def) = catalog.get(&item.device_id) else { continue };
        match lines.iter_mut().find(|(id, _)| *id == def.id) {
            Some((_, line)) => line.count += 1,
            None => lines.push((
                def.id.clone(),
                EquipmentLine {
                    manufacturer: def.manufacturer.clone(),
                    model: def.model.clone(),
                    category: def.category,
                    count: 1,
                },
            )),
        }
    }

    let mut lines: Vec<EquipmentLine> = lines.into_iter().map(|(_, line)| line).collect();
    lines.sort_by(|a, b| {
        a.category
            .as_str()
            .cmp(b.category.as_str())
            .then_with(|| a.model.cmp(&b.model))
    });
    lines
}
