//! Best-effort results.
//!
//! Engines never raise. Anything they had to leave out is recorded as an
//! [`Omission`] so callers and tests can see why a cable or row is missing.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OmissionKind {
    /// Item references a device id the catalog does not know.
    MissingDefinition,
    /// A role expected a port the device does not have.
    MissingPort,
    /// The hub has no entry in the input-port table.
    UnmappedHubModel,
    /// More sources than the hub has mapped inputs.
    CapacityExceeded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Omission {
    pub kind: OmissionKind,
    pub instance_id: String,
    pub detail: String,
}

impl Omission {
    pub fn new(kind: OmissionKind, instance_id: &str, detail: impl Into<String>) -> Self {
        Self { kind, instance_id: instance_id.to_string(), detail: detail.into() }
    }
}

impl fmt::Display for Omission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} on {}: {}", self.kind, self.instance_id, self.detail)
    }
}

/// Output plus the reasons anything was left out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub output: T,
    pub omissions: Vec<Omission>,
}

impl<T> Outcome<T> {
    pub fn new(output: T, omissions: Vec<Omission>) -> Self {
        Self { output, omissions }
    }

    pub fn is_complete(&self) -> bool {
        self.omissions.is_empty()
    }

    pub fn count(&self, kind: OmissionKind) -> usize {
        self.omissions.iter().filter(|o| o.kind == kind).count()
    }
}
