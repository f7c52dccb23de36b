//! Bill of materials.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, PortKind};
use crate::session::PlacedItem;
use crate::topology::{Cable, CableKind};

pub const POWER_CABLE: &str = "IEC Power Cable";
pub const DATA_CABLE: &str = "USB A-to-B Cable";
pub const RCA_PAIR: &str = "RCA Audio Stereo Pair";
pub const XLR_CABLE: &str = "XLR Cable";
pub const GROUND_WIRE: &str = "Ground Wire";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ManifestCategory {
    Device,
    Cable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestRow {
    pub name: String,
    pub quantity: usize,
    pub category: ManifestCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ManifestRow {
    fn cable(name: &str, quantity: usize) -> Self {
        Self { name: name.to_string(), quantity, category: ManifestCategory::Cable, details: None }
    }
}

/// Device rows (grouped by model, first-seen order) followed by cable rows.
pub fn generate_manifest(items: &[PlacedItem], cables: &[Cable], catalog: &Catalog) -> Vec<ManifestRow> {
    let mut rows: Vec<ManifestRow> = Vec::new();

    for item in items {
        let def = catalog.get(&item.device_id);
        let name = def.map_or(item.device_id.as_str(), |d| d.model.as_str());
        match rows.iter_mut().find(|r| r.name == name) {
            Some(row) => row.quantity += 1,
            None => rows.push(ManifestRow {
                name: name.to_string(),
                quantity: 1,
                category: ManifestCategory::Device,
                details: def.map(|d| d.manufacturer.clone()),
            }),
        }
    }

    let count = |kind: CableKind| cables.iter().filter(|c| c.kind == kind).count();

    let (mut rca, mut xlr) = (0, 0);
    for cable in cables.iter().filter(|c| c.kind == CableKind::Audio) {
        let origin_kind = items
            .iter()
            .find(|i| i.instance_id == cable.from.instance_id)
            .and_then(|i| catalog.get(&i.device_id))
            .and_then(|d| d.find_port(&cable.from.port_id))
            .map(|p| p.kind);
        if origin_kind == Some(PortKind::Xlr) {
            xlr += 1;
        } else {
            rca += 1;
        }
    }

    let cable_rows = [
        (POWER_CABLE, count(CableKind::Power)),
        (DATA_CABLE, count(CableKind::Data)),
        (RCA_PAIR, rca),
        (XLR_CABLE, xlr),
        (GROUND_WIRE, count(CableKind::Ground)),
    ];
    rows.extend(
        cable_rows
            .into_iter()
            .filter(|&(_, n)| n > 0)
            .map(|(name, n)| ManifestRow::cable(name, n)),
    );
    rows
}
