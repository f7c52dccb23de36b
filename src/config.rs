//! Engine Configuration
//!
//! Every constant the engines use lives here. Missing fields fall back to
//! the stock values, so a config file only needs the overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub cabling: CablingConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.routing.lane_count == 0 {
            return Err(ConfigError::InvalidValue("routing.laneCount", "must be at least 1".into()));
        }
        if self.view.min_scale <= 0.0 || self.view.min_scale > self.view.max_scale {
            return Err(ConfigError::InvalidValue(
                "view.minScale",
                format!("{} must be positive and <= maxScale {}", self.view.min_scale, self.view.max_scale),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CablingConfig {
    #[serde(default = "default_strip_device_id")]
    pub strip_device_id: String,
    #[serde(default = "default_strip_inlet_port")]
    pub strip_inlet_port: String,
    #[serde(default = "default_strip_outlet_prefix")]
    pub strip_outlet_prefix: String,
    #[serde(default = "default_strip_capacity")]
    pub strip_capacity: usize,
}

fn default_strip_device_id() -> String { crate::equipment::POWER_STRIP_ID.to_string() }
fn default_strip_inlet_port() -> String { "ac-in".to_string() }
fn default_strip_outlet_prefix() -> String { "ac-".to_string() }
fn default_strip_capacity() -> usize { 6 }

impl Default for CablingConfig {
    fn default() -> Self {
        Self {
            strip_device_id: default_strip_device_id(),
            strip_inlet_port: default_strip_inlet_port(),
            strip_outlet_prefix: default_strip_outlet_prefix(),
            strip_capacity: default_strip_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutingConfig {
    #[serde(default = "default_lane_count")]
    pub lane_count: usize,
    #[serde(default = "default_lane_height")]
    pub lane_height: f64,
    #[serde(default = "default_base_clearance")]
    pub base_clearance: f64,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
    #[serde(default = "default_vertical_tolerance")]
    pub vertical_tolerance: f64,
    #[serde(default = "default_vertical_min_drop")]
    pub vertical_min_drop: f64,
    /// Drop length for cables that end at an unmanaged sink.
    #[serde(default = "default_dangling_drop")]
    pub dangling_drop: f64,
}

fn default_lane_count() -> usize { 8 }
fn default_lane_height() -> f64 { 12.0 }
fn default_base_clearance() -> f64 { 100.0 }
fn default_corner_radius() -> f64 { 15.0 }
fn default_vertical_tolerance() -> f64 { 5.0 }
fn default_vertical_min_drop() -> f64 { 100.0 }
fn default_dangling_drop() -> f64 { 300.0 }

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            lane_count: default_lane_count(),
            lane_height: default_lane_height(),
            base_clearance: default_base_clearance(),
            corner_radius: default_corner_radius(),
            vertical_tolerance: default_vertical_tolerance(),
            vertical_min_drop: default_vertical_min_drop(),
            dangling_drop: default_dangling_drop(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default = "default_center_x")]
    pub center_x: f64,
    #[serde(default = "default_table_y")]
    pub table_y: f64,
    #[serde(default = "default_floor_y")]
    pub floor_y: f64,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    #[serde(default = "default_pa_offset")]
    pub pa_offset: f64,
    /// How far tops sit above the table row.
    #[serde(default = "default_top_lift")]
    pub top_lift: f64,
    #[serde(default = "default_sub_spacing")]
    pub sub_spacing: f64,
    #[serde(default = "default_other_gap")]
    pub other_gap: f64,
}

fn default_center_x() -> f64 { 800.0 }
fn default_table_y() -> f64 { 150.0 }
fn default_floor_y() -> f64 { 600.0 }
fn default_spacing() -> f64 { 20.0 }
fn default_pa_offset() -> f64 { 150.0 }
fn default_top_lift() -> f64 { 50.0 }
fn default_sub_spacing() -> f64 { 5.0 }
fn default_other_gap() -> f64 { 100.0 }

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x: default_center_x(),
            table_y: default_table_y(),
            floor_y: default_floor_y(),
            spacing: default_spacing(),
            pa_offset: default_pa_offset(),
            top_lift: default_top_lift(),
            sub_spacing: default_sub_spacing(),
            other_gap: default_other_gap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,
    /// Visible canvas size in screen pixels.
    #[serde(default = "default_viewport")]
    pub viewport: [f64; 2],
}

fn default_padding() -> f64 { 150.0 }
fn default_min_scale() -> f64 { 0.2 }
fn default_max_scale() -> f64 { 1.0 }
fn default_viewport() -> [f64; 2] { [1280.0, 800.0] }

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            viewport: default_viewport(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfig {
    #[serde(default = "default_origin")]
    pub origin_x: f64,
    #[serde(default = "default_origin")]
    pub origin_y: f64,
    #[serde(default = "default_step_x")]
    pub step_x: f64,
}

fn default_origin() -> f64 { 100.0 }
fn default_step_x() -> f64 { 360.0 }

impl Default for PlacementConfig {
    fn default() -> Self {
        Self { origin_x: default_origin(), origin_y: default_origin(), step_x: default_step_x() }
    }
}
