//! Booth Session - Single Entry Point for Editing Commands
//!
//! Holds the booth state and drives the engines. Readiness is recomputed
//! after every item mutation; cables only change on explicit commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::catalog::{Catalog, CatalogError};
use crate::config::{ConfigError, EngineConfig};
use crate::hashing::compute_content_hash;
use crate::layout::{auto_arrange, ArrangeResult};
use crate::manifest::{generate_manifest, ManifestRow};
use crate::outcome::Omission;
use crate::readiness::{ReadinessAnalyzer, ReadinessResult};
use crate::routing::{route_cables, Face, RoutedCable};
use crate::topology::{Cable, HubPortMap, TopologyEngine};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static READINESS_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_readiness_call_count() -> u32 {
    READINESS_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_readiness_call_count() {
    READINESS_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Device not found: {0}")]
    UnknownDevice(String),

    #[error("No placed item with id {0}")]
    UnknownInstance(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One device on the stage canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedItem {
    pub instance_id: String,
    pub device_id: String,
    pub x: f64,
    pub y: f64,
}

impl PlacedItem {
    pub fn new(instance_id: &str, device_id: &str, x: f64, y: f64) -> Self {
        Self { instance_id: instance_id.to_string(), device_id: device_id.to_string(), x, y }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CablingReport {
    pub cables: Vec<Cable>,
    pub manifest: Vec<ManifestRow>,
    pub omissions: Vec<Omission>,
    /// Covers cables and manifest only, so identical booths hash equal.
    pub content_hash: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct HashedContent<'a> {
    cables: &'a [Cable],
    manifest: &'a [ManifestRow],
}

pub struct BoothSession {
    catalog: Catalog,
    config: EngineConfig,
    topology: TopologyEngine,
    analyzer: ReadinessAnalyzer,
    items: Vec<PlacedItem>,
    face: Face,
    cables: Vec<Cable>,
    manifest: Vec<ManifestRow>,
    readiness: ReadinessResult,
}

impl BoothSession {
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        let topology = TopologyEngine::new(config.cabling.clone(), HubPortMap::stock());
        Self {
            catalog,
            config,
            topology,
            analyzer: ReadinessAnalyzer::new(),
            items: Vec::new(),
            face: Face::default(),
            cables: Vec::new(),
            manifest: Vec::new(),
            readiness: ReadinessResult::empty(),
        }
    }

    /// Session from an optional config file and catalog directory.
    pub fn open(config_path: Option<&Path>, catalog_dir: Option<&Path>) -> Result<Self, SessionError> {
        let config = match config_path {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        let catalog = match catalog_dir {
            Some(dir) => Catalog::load_from_dir(dir)?,
            None => Catalog::builtin(),
        };
        Ok(Self::new(catalog, config))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn cables(&self) -> &[Cable] {
        &self.cables
    }

    pub fn manifest(&self) -> &[ManifestRow] {
        &self.manifest
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn readiness(&self) -> &ReadinessResult {
        &self.readiness
    }

    /// Replace the whole item list (imports, CLI payloads).
    pub fn load_items(&mut self, items: Vec<PlacedItem>) {
        self.items = items;
        self.refresh_readiness();
    }

    /// Place a new device to the right of the existing ones.
    pub fn add_item(&mut self, device_id: &str) -> Result<&PlacedItem, SessionError> {
        if self.catalog.get(device_id).is_none() {
            return Err(SessionError::UnknownDevice(device_id.to_string()));
        }

        let placement = &self.config.placement;
        let x = placement.origin_x + self.items.len() as f64 * placement.step_x;
        let instance_id = format!("dev-{}", Uuid::new_v4());
        info!(device = device_id, instance = %instance_id, x, "item added");

        self.items.push(PlacedItem::new(&instance_id, device_id, x, placement.origin_y));
        self.refresh_readiness();

        let idx = self.items.len() - 1;
        Ok(&self.items[idx])
    }

    pub fn move_item(&mut self, instance_id: &str, x: f64, y: f64) -> Result<(), SessionError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.instance_id == instance_id)
            .ok_or_else(|| SessionError::UnknownInstance(instance_id.to_string()))?;
        item.x = x;
        item.y = y;
        self.refresh_readiness();
        Ok(())
    }

    /// Drop an item. Existing cables are left for the next regeneration.
    pub fn remove_item(&mut self, instance_id: &str) -> Result<PlacedItem, SessionError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.instance_id == instance_id)
            .ok_or_else(|| SessionError::UnknownInstance(instance_id.to_string()))?;
        let removed = self.items.remove(idx);
        info!(instance = instance_id, "item removed");
        self.refresh_readiness();
        Ok(removed)
    }

    pub fn toggle_face(&mut self) -> Face {
        self.face = self.face.toggled();
        self.face
    }

    pub fn set_face(&mut self, face: Face) {
        self.face = face;
    }

    /// Replace the cable list and manifest with freshly inferred ones.
    pub fn generate_cables(&mut self) -> Result<CablingReport, SessionError> {
        let outcome = self.topology.generate(&self.items, &self.catalog);
        let omissions = outcome.omissions;
        self.cables = outcome.output;
        self.manifest = generate_manifest(&self.items, &self.cables, &self.catalog);

        let content_hash = compute_content_hash(&HashedContent { cables: &self.cables, manifest: &self.manifest })?;
        info!(cables = self.cables.len(), omissions = omissions.len(), hash = %content_hash, "cables generated");

        Ok(CablingReport {
            cables: self.cables.clone(),
            manifest: self.manifest.clone(),
            omissions,
            content_hash,
            generated_at: Utc::now(),
        })
    }

    pub fn clear_cables(&mut self) {
        self.cables.clear();
        self.manifest.clear();
    }

    /// Move every known item into its zone. Cables are kept as they are.
    pub fn auto_arrange(&mut self) -> ArrangeResult {
        let result = auto_arrange(&self.items, &self.catalog, self.face, &self.config.layout, &self.config.view);
        self.items = result.items.clone();
        info!(items = self.items.len(), "booth arranged");
        self.refresh_readiness();
        result
    }

    /// Routed geometry of the current cables for the current face.
    pub fn route(&self) -> Vec<RoutedCable> {
        route_cables(&self.items, &self.cables, &self.catalog, self.face, &self.config.routing)
    }

    fn refresh_readiness(&mut self) {
        #[cfg(feature = "test-hooks")]
        READINESS_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.readiness = self.analyzer.analyze(&self.items, &self.catalog);
    }
}

impl Default for BoothSession {
    fn default() -> Self {
        Self::new(Catalog::builtin(), EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readiness::ReadinessStatus;

    #[test]
    fn test_add_item_places_in_a_row() {
        let mut session = BoothSession::default();
        session.add_item("djm-900").unwrap();
        let second = session.add_item("cdj-3000").unwrap().clone();
        assert!(second.instance_id.starts_with("dev-"));
        assert_eq!((second.x, second.y), (460.0, 100.0));
    }

    #[test]
    fn test_unknown_device_rejected() {
        let mut session = BoothSession::default();
        assert!(matches!(session.add_item("nope"), Err(SessionError::UnknownDevice(_))));
        assert!(session.items().is_empty());
    }

    #[test]
    fn test_readiness_follows_mutations() {
        let mut session = BoothSession::default();
        assert_eq!(session.readiness().status, ReadinessStatus::Empty);

        let mixer = session.add_item("djm-900").unwrap().instance_id.clone();
        assert_eq!(session.readiness().status, ReadinessStatus::Incomplete);

        session.add_item("cdj-3000").unwrap();
        session.add_item("senn-hd25").unwrap();
        assert_eq!(session.readiness().status, ReadinessStatus::Ready);

        session.remove_item(&mixer).unwrap();
        assert_eq!(session.readiness().message, "No Audio Mixer/Hub");
    }

    #[test]
    fn test_remove_keeps_cables() {
        let mut session = BoothSession::default();
        let deck = session.add_item("cdj-3000").unwrap().instance_id.clone();
        session.add_item("djm-900").unwrap();
        let report = session.generate_cables().unwrap();
        assert!(!report.cables.is_empty());

        session.remove_item(&deck).unwrap();
        assert_eq!(session.cables().len(), report.cables.len());

        session.clear_cables();
        assert!(session.cables().is_empty());
        assert!(session.manifest().is_empty());
    }

    #[test]
    fn test_content_hash_ignores_timestamp() {
        let items = vec![PlacedItem::new("m", "djm-900", 0.0, 0.0), PlacedItem::new("d", "cdj-3000", 400.0, 0.0)];
        let mut a = BoothSession::default();
        a.load_items(items.clone());
        let mut b = BoothSession::default();
        b.load_items(items);
        assert_eq!(a.generate_cables().unwrap().content_hash, b.generate_cables().unwrap().content_hash);
    }

    #[test]
    fn test_move_unknown_instance() {
        let mut session = BoothSession::default();
        assert!(matches!(session.move_item("ghost", 0.0, 0.0), Err(SessionError::UnknownInstance(_))));
    }

    #[test]
    fn test_toggle_face_changes_routing() {
        let mut session = BoothSession::default();
        session.load_items(vec![PlacedItem::new("m", "djm-900", 0.0, 0.0), PlacedItem::new("d", "cdj-3000", 400.0, 0.0)]);
        session.generate_cables().unwrap();

        assert_eq!(session.face(), Face::Front);
        let front = session.route();
        assert_eq!(session.toggle_face(), Face::Back);
        let back = session.route();
        assert_eq!(front.len(), back.len());
        assert_ne!(front, back);
    }
}
