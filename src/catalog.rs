//! Device Catalog - Read-Only Reference Table
//!
//! Definitions are loaded once and shared by reference. Engines only reason
//! about port identity and kind; coordinates exist for anchoring cables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{ENGINE_VERSION, MIN_CATALOG_VERSION};

pub type DeviceId = String;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog requires engine >= {0}, current is {1}")]
    EngineVersionMismatch(String, String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Player,
    Mixer,
    AllInOne,
    Controller,
    Speaker,
    Accessory,
}

impl DeviceCategory {
    /// Mixers, all-in-ones and controllers can act as the central hub.
    pub fn is_hub_like(self) -> bool {
        matches!(self, Self::Mixer | Self::AllInOne | Self::Controller)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Mixer => "mixer",
            Self::AllInOne => "all_in_one",
            Self::Controller => "controller",
            Self::Speaker => "speaker",
            Self::Accessory => "accessory",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Power,
    Rca,
    Xlr,
    Data,
    Ground,
    /// Drawn on the panel, never cabled.
    Visual,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Port {
    pub id: String,
    pub kind: PortKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl Port {
    pub fn new(id: &str, kind: PortKind, x: f64, y: f64) -> Self {
        Self { id: id.to_string(), kind, x, y, label: None }
    }

    pub fn labeled(id: &str, kind: PortKind, x: f64, y: f64, label: &str) -> Self {
        Self { label: Some(label.to_string()), ..Self::new(id, kind, x, y) }
    }

    pub fn label_contains(&self, needle: &str) -> bool {
        self.label.as_deref().map_or(false, |l| l.contains(needle))
    }

    /// Label if present, otherwise the port id.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDefinition {
    pub id: DeviceId,
    pub model: String,
    pub manufacturer: String,
    pub category: DeviceCategory,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rear_height: Option<f64>,
    #[serde(default)]
    pub description: String,
    /// Explicit classification; falls back to the description heuristic.
    #[serde(default)]
    pub subwoofer: Option<bool>,
    #[serde(default)]
    pub turntable: Option<bool>,
    #[serde(default)]
    pub front_ports: Vec<Port>,
    #[serde(default)]
    pub back_ports: Vec<Port>,
}

impl DeviceDefinition {
    pub fn is_subwoofer(&self) -> bool {
        self.category == DeviceCategory::Speaker
            && self
                .subwoofer
                .unwrap_or_else(|| self.description.to_lowercase().contains("sub"))
    }

    pub fn is_top(&self) -> bool {
        self.category == DeviceCategory::Speaker && !self.is_subwoofer()
    }

    pub fn is_turntable(&self) -> bool {
        self.turntable.unwrap_or_else(|| {
            self.id.to_lowercase().contains("sl-12") || self.model.to_uppercase().contains("SL-12")
        })
    }

    /// Back-face height, defaulting to the front footprint.
    pub fn rear_height(&self) -> f64 {
        self.rear_height.unwrap_or(self.height)
    }

    /// Look a port up on the back face first, then the front face.
    pub fn find_port(&self, port_id: &str) -> Option<&Port> {
        self.back_ports
            .iter()
            .find(|p| p.id == port_id)
            .or_else(|| self.front_ports.iter().find(|p| p.id == port_id))
    }

    pub fn power_inlet(&self) -> Option<&Port> {
        self.back_ports
            .iter()
            .find(|p| p.kind == PortKind::Power)
            .or_else(|| {
                self.back_ports.iter().find(|p| {
                    p.kind != PortKind::Visual && (p.id.contains("ac") || p.id.contains("pwr"))
                })
            })
    }

    pub fn audio_output(&self) -> Option<&Port> {
        self.back_ports
            .iter()
            .find(|p| p.kind == PortKind::Rca && (p.id.contains("out") || p.id == "rca"))
    }

    pub fn ground_terminal(&self) -> Option<&Port> {
        self.back_ports
            .iter()
            .find(|p| p.kind == PortKind::Ground || p.id == "gnd")
    }

    /// Stereo master pair, matched on "MASTER"/"MAIN" labels.
    pub fn master_outputs(&self) -> (Option<&Port>, Option<&Port>) {
        let find = |side: &str| {
            self.back_ports.iter().find(|p| {
                p.label_contains(&format!("MASTER {}", side)) || p.label_contains(&format!("MAIN {}", side))
            })
        };
        (find("L"), find("R"))
    }

    pub fn usb_port(&self) -> Option<&Port> {
        self.back_ports
            .iter()
            .find(|p| p.label.as_deref() == Some("USB"))
    }
}

/// Catalog file as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    #[serde(default = "default_min_version")]
    pub engine_min_version: String,
    #[serde(default)]
    pub devices: Vec<DeviceDefinition>,
}

fn default_min_version() -> String {
    MIN_CATALOG_VERSION.to_string()
}

/// Device registry - insertion ordered, queryable by id
#[derive(Debug, Clone)]
pub struct Catalog {
    devices: Vec<DeviceDefinition>,
    index: HashMap<DeviceId, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { devices: Vec::new(), index: HashMap::new() }
    }

    /// Stock equipment table shipped with the engine.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for device in crate::equipment::stock_devices() {
            catalog.register(device);
        }
        catalog
    }

    /// Load every `*.json` catalog file in `dir` on top of the stock table.
    ///
    /// Files that fail to parse or need a newer engine are skipped.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        if dir.exists() {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.extension().map_or(false, |e| e == "json") {
                    match Self::read_file(&path) {
                        Ok(file) => {
                            debug!(path = %path.display(), count = file.devices.len(), "loaded catalog file");
                            for device in file.devices {
                                catalog.register(device);
                            }
                        }
                        Err(e) => warn!(path = %path.display(), error = %e, "skipping catalog file"),
                    }
                }
            }
        }
        Ok(catalog)
    }

    fn read_file(path: &Path) -> Result<CatalogFile, CatalogError> {
        let content = fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        check_engine_version(&file.engine_min_version)?;
        Ok(file)
    }

    pub fn get(&self, id: &str) -> Option<&DeviceDefinition> {
        self.index.get(id).map(|&i| &self.devices[i])
    }

    pub fn list(&self) -> &[DeviceDefinition] {
        &self.devices
    }

    /// Register a definition, replacing any existing one with the same id.
    pub fn register(&mut self, device: DeviceDefinition) {
        match self.index.get(&device.id) {
            Some(&i) => self.devices[i] = device,
            None => {
                self.index.insert(device.id.clone(), self.devices.len());
                self.devices.push(device);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_engine_version(min: &str) -> Result<(), CatalogError> {
    let engine = semver::Version::parse(ENGINE_VERSION)
        .map_err(|_| CatalogError::InvalidVersion(ENGINE_VERSION.to_string()))?;
    let required = semver::Version::parse(min)
        .map_err(|_| CatalogError::InvalidVersion(min.to_string()))?;
    if engine < required {
        return Err(CatalogError::EngineVersionMismatch(min.to_string(), ENGINE_VERSION.to_string()));
    }
    Ok(())
}
