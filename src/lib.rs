//! BoothForge Core - Booth Compiler
//!
//! # The Five Engines
//! 1. Topology infers the cable graph from device roles
//! 2. Routing turns connections into rectilinear lanes
//! 3. Readiness reports what the rig can and cannot do
//! 4. Manifest counts what goes in the flight case
//! 5. Layout arranges the booth into functional zones
//!
//! Engines are pure and never fail. Whatever they could not do is
//! reported as [`Omission`] records next to the best-effort output.

pub mod catalog;
pub mod equipment;
pub mod outcome;
pub mod topology;
pub mod routing;
pub mod readiness;
pub mod manifest;
pub mod layout;
pub mod patch;
pub mod hashing;
pub mod config;
pub mod session;

pub use catalog::{Catalog, CatalogError, DeviceCategory, DeviceDefinition, Port, PortKind};
pub use outcome::{Omission, OmissionKind, Outcome};
pub use topology::{generate_cables, Cable, CableKind, Endpoint, HubPortMap};
pub use routing::{calculate_cable_geometry, route_cables, CablePath, Face, Point, RoutedCable};
pub use readiness::{analyze_setup, ReadinessResult, ReadinessStatus};
pub use manifest::{generate_manifest, ManifestCategory, ManifestRow};
pub use layout::{auto_arrange, fit_view, ArrangeResult, ViewFit};
pub use patch::{equipment_list, patch_sheet, PatchRow};
pub use hashing::{canonical_json, cable_id, compute_content_hash};
pub use config::{ConfigError, EngineConfig};
pub use session::{BoothSession, CablingReport, PlacedItem, SessionError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_CATALOG_VERSION: &str = "1.0.0";
