//! Readiness Analysis - Rule/Policy Separation
//!
//! Rules read a census of the booth and produce findings.
//! Policy folds findings into one status and message.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, DeviceCategory};
use crate::equipment::XDJ_XZ_ID;
use crate::session::PlacedItem;

pub const MISSING_HEADPHONES: &str = "Headphones";
pub const MISSING_POWER: &str = "Power Extension / Distro";
pub const MISSING_HUB: &str = "Mixer or All-In-One unit";
pub const MISSING_SOURCES: &str = "CDJs or Turntables";

/// External decks the XZ can take on its line inputs.
const XZ_EXTERNAL_DECKS: usize = 2;

/// Above this many items a power distro is expected.
const POWER_DISTRO_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Empty,
    Incomplete,
    Ready,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadinessResult {
    pub status: ReadinessStatus,
    pub message: String,
    pub capabilities: Vec<String>,
    pub missing: Vec<String>,
    /// Rule that set the status, if any did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

impl ReadinessResult {
    pub fn empty() -> Self {
        Self {
            status: ReadinessStatus::Empty,
            message: "Booth is empty.".to_string(),
            capabilities: vec![],
            missing: vec![],
            decided_by: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}

/// Counts every rule works from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupCensus {
    pub items: usize,
    pub players: usize,
    pub mixers: usize,
    pub all_in_ones: usize,
    pub controllers: usize,
    pub turntables: usize,
    pub tops: usize,
    pub subs: usize,
    pub has_headphones: bool,
    pub has_power_distro: bool,
    pub has_xz: bool,
}

impl SetupCensus {
    pub fn take(items: &[PlacedItem], catalog: &Catalog) -> Self {
        let mut census = Self { items: items.len(), ..Self::default() };

        for item in items {
            let Some(def) = catalog.get(&item.device_id) else { continue };
            match def.category {
                DeviceCategory::Player => census.players += 1,
                DeviceCategory::Mixer => census.mixers += 1,
                DeviceCategory::AllInOne => census.all_in_ones += 1,
                DeviceCategory::Controller => census.controllers += 1,
                DeviceCategory::Speaker if def.is_subwoofer() => census.subs += 1,
                DeviceCategory::Speaker => census.tops += 1,
                DeviceCategory::Accessory => {
                    let id = item.device_id.to_lowercase();
                    census.has_headphones |= id.contains("hd25") || id.contains("phone");
                    census.has_power_distro |= id.contains("pwr") || id.contains("strip");
                }
            }
            if def.is_turntable() {
                census.turntables += 1;
            }
            census.has_xz |= item.device_id == XDJ_XZ_ID;
        }
        census
    }

    pub fn hubs(&self) -> usize {
        self.mixers + self.all_in_ones + self.controllers
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    Capability(String),
    Missing(String),
    /// Overrides the status; later rules win.
    Status(ReadinessStatus, String),
}

/// Readiness rule trait - produces findings
pub trait ReadinessRule {
    fn name(&self) -> &'static str;
    fn evaluate(&self, census: &SetupCensus) -> Vec<Finding>;
}

// --- Concrete Rules ---

pub struct CapabilityRule;

impl ReadinessRule for CapabilityRule {
    fn name(&self) -> &'static str { "capabilities" }

    fn evaluate(&self, census: &SetupCensus) -> Vec<Finding> {
        let mut found = vec![];
        if census.turntables > 0 {
            found.push(Finding::Capability("Vinyl Playback".to_string()));
        }
        if census.all_in_ones > 0 {
            found.push(Finding::Capability("Standalone Mode".to_string()));
        }
        if census.controllers > 0 {
            found.push(Finding::Capability("Laptop Control".to_string()));
        }
        if census.players > 0 {
            found.push(Finding::Capability("Digital Playback".to_string()));
        }
        if census.tops > 0 || census.subs > 0 {
            found.push(Finding::Capability(format!("PA System ({} Tops, {} Subs)", census.tops, census.subs)));
        }
        found
    }
}

pub struct AccessoryRule;

impl ReadinessRule for AccessoryRule {
    fn name(&self) -> &'static str { "accessories" }

    fn evaluate(&self, census: &SetupCensus) -> Vec<Finding> {
        let mut found = vec![];
        if !census.has_headphones && census.hubs() > 0 {
            found.push(Finding::Missing(MISSING_HEADPHONES.to_string()));
        }
        if !census.has_power_distro && census.items > POWER_DISTRO_THRESHOLD {
            found.push(Finding::Missing(MISSING_POWER.to_string()));
        }
        found
    }
}

pub struct HubRule;

impl ReadinessRule for HubRule {
    fn name(&self) -> &'static str { "hub" }

    fn evaluate(&self, census: &SetupCensus) -> Vec<Finding> {
        if census.hubs() == 0 {
            return vec![
                Finding::Status(ReadinessStatus::Incomplete, "No Audio Mixer/Hub".to_string()),
                Finding::Missing(MISSING_HUB.to_string()),
            ];
        }
        // Only a bare mixer needs external sources; the others play on their own.
        if census.mixers > 0 && census.players == 0 && census.all_in_ones == 0 && census.controllers == 0 {
            return vec![
                Finding::Status(ReadinessStatus::Incomplete, "No Audio Sources".to_string()),
                Finding::Missing(MISSING_SOURCES.to_string()),
            ];
        }
        vec![]
    }
}

pub struct DeckLimitRule;

impl ReadinessRule for DeckLimitRule {
    fn name(&self) -> &'static str { "deck_limit" }

    fn evaluate(&self, census: &SetupCensus) -> Vec<Finding> {
        if !census.has_xz {
            return vec![];
        }
        let mut found = vec![Finding::Capability("4-Deck Support (2 External)".to_string())];
        if census.players > XZ_EXTERNAL_DECKS {
            found.push(Finding::Status(ReadinessStatus::Warning, "XDJ-XZ limited to 2 ext decks".to_string()));
        }
        found
    }
}

/// Analyzer orchestrates rules and applies the status policy
pub struct ReadinessAnalyzer {
    rules: Vec<Box<dyn ReadinessRule>>,
}

impl ReadinessAnalyzer {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(CapabilityRule),
                Box::new(AccessoryRule),
                Box::new(HubRule),
                Box::new(DeckLimitRule),
            ],
        }
    }

    pub fn analyze(&self, items: &[PlacedItem], catalog: &Catalog) -> ReadinessResult {
        if items.is_empty() {
            return ReadinessResult::empty();
        }

        let census = SetupCensus::take(items, catalog);
        let mut result = ReadinessResult {
            status: ReadinessStatus::Ready,
            message: "Setup Ready".to_string(),
            capabilities: vec![],
            missing: vec![],
            decided_by: None,
        };

        for rule in &self.rules {
            let findings = rule.evaluate(&census);
            debug!(rule = rule.name(), findings = findings.len(), "readiness rule");
            for finding in findings {
                match finding {
                    Finding::Capability(c) => result.capabilities.push(c),
                    Finding::Missing(m) => result.missing.push(m),
                    Finding::Status(status, message) => {
                        result.status = status;
                        result.message = message;
                        result.decided_by = Some(rule.name().to_string());
                    }
                }
            }
        }

        // A technically complete booth with suggestions is a warning; the
        // message only names the first suggestion.
        if result.status == ReadinessStatus::Ready {
            if let Some(first) = result.missing.first() {
                result.status = ReadinessStatus::Warning;
                result.message = format!("Missing: {}", first);
            }
        }

        result
    }
}

impl Default for ReadinessAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn analyze_setup(items: &[PlacedItem], catalog: &Catalog) -> ReadinessResult {
    ReadinessAnalyzer::new().analyze(items, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booth(devices: &[&str]) -> Vec<PlacedItem> {
        devices
            .iter()
            .enumerate()
            .map(|(i, d)| PlacedItem::new(&format!("i{}", i), d, i as f64 * 100.0, 0.0))
            .collect()
    }

    #[test]
    fn test_complete_booth_is_ready() {
        let r = analyze_setup(&booth(&["djm-900", "cdj-3000", "senn-hd25"]), &Catalog::builtin());
        assert_eq!(r.status, ReadinessStatus::Ready);
        assert_eq!(r.message, "Setup Ready");
        assert_eq!(r.decided_by, None);
        assert_eq!(r.capabilities, vec!["Digital Playback"]);
        assert!(r.missing.is_empty());
    }

    #[test]
    fn test_missing_headphones_warns_with_first_only() {
        let r = analyze_setup(&booth(&["djm-900", "cdj-3000", "cdj-3000", "qsc-k12-2"]), &Catalog::builtin());
        assert_eq!(r.status, ReadinessStatus::Warning);
        assert_eq!(r.missing, vec![MISSING_HEADPHONES, MISSING_POWER]);
        assert_eq!(r.message, "Missing: Headphones");
    }

    #[test]
    fn test_bare_mixer_has_no_sources() {
        let r = analyze_setup(&booth(&["djm-900", "senn-hd25"]), &Catalog::builtin());
        assert_eq!(r.status, ReadinessStatus::Incomplete);
        assert_eq!(r.message, "No Audio Sources");
        assert_eq!(r.missing, vec![MISSING_SOURCES]);
        assert_eq!(r.decided_by.as_deref(), Some("hub"));
    }

    #[test]
    fn test_all_in_one_needs_no_sources() {
        let r = analyze_setup(&booth(&["xdj-rx3", "senn-hd25"]), &Catalog::builtin());
        assert_eq!(r.status, ReadinessStatus::Ready);
        assert_eq!(r.capabilities, vec!["Standalone Mode"]);
    }

    #[test]
    fn test_xz_deck_limit() {
        let r = analyze_setup(
            &booth(&["xdj-xz", "cdj-3000", "cdj-3000", "sl-1200", "senn-hd25", "pwr-strip"]),
            &Catalog::builtin(),
        );
        assert_eq!(r.status, ReadinessStatus::Warning);
        assert_eq!(r.message, "XDJ-XZ limited to 2 ext decks");
        assert_eq!(r.decided_by.as_deref(), Some("deck_limit"));
        assert!(r.capabilities.contains(&"4-Deck Support (2 External)".to_string()));
        assert!(r.capabilities.contains(&"Vinyl Playback".to_string()));
    }

    #[test]
    fn test_pa_summary() {
        let r = analyze_setup(
            &booth(&["djm-900", "cdj-3000", "qsc-k12-2", "qsc-k12-2", "qsc-ks118"]),
            &Catalog::builtin(),
        );
        assert!(r.capabilities.contains(&"PA System (2 Tops, 1 Subs)".to_string()));
    }

    #[test]
    fn test_unknown_devices_count_only_toward_item_total() {
        let census = SetupCensus::take(&booth(&["mystery", "djm-900"]), &Catalog::builtin());
        assert_eq!(census.items, 2);
        assert_eq!(census.mixers, 1);
        assert_eq!(census.players, 0);
    }
}
