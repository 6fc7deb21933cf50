//! Read-only reference data for the Matter device model.
//!
//! This crate holds the cluster, capability, and device type metadata the
//! scoring and comparison engine resolves telemetry against. All lookups are
//! non-erroring: an unknown id simply returns `None` and callers skip it.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

pub mod catalog;

/// Endpoint identifier within a device node.
pub type EndpointId = u16;
/// Cluster identifier as assigned by the Matter specification.
pub type ClusterId = u32;
/// Device type identifier as assigned by the Matter specification.
pub type DeviceTypeId = u32;

/// Display category a capability or cluster belongs to.
///
/// Declaration order is the canonical ordering used for grouped output;
/// anything the registry cannot place sorts into `Other`, which comes last.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoryKey {
    Controls,
    Sensors,
    Automation,
    Monitoring,
    Comfort,
    Security,
    Media,
    Other,
}

/// Metadata for a Matter cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClusterMetadata {
    pub id: ClusterId,
    pub name: &'static str,
    pub category: CategoryKey,
    /// Attributes every conformant server instance must expose.
    pub mandatory_attributes: &'static [&'static str],
    /// Commands every conformant server instance must accept.
    pub mandatory_commands: &'static [&'static str],
}

/// A user-facing capability backed by one defining cluster.
///
/// `required_attributes`/`required_commands` are the elements this capability
/// needs on top of the cluster's own mandatory set; for most capabilities the
/// cluster being present at all is enough and these are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityDef {
    pub key: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    pub category: CategoryKey,
    pub cluster: ClusterId,
    pub required_attributes: &'static [&'static str],
    pub required_commands: &'static [&'static str],
    /// Matter specification revision that introduced the capability.
    pub spec_version: &'static str,
}

/// Metadata for a Matter device type, including its capability requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceTypeMetadata {
    pub id: DeviceTypeId,
    pub name: &'static str,
    pub display_category: CategoryKey,
    pub spec_version: &'static str,
    /// Capability keys a conformant device of this type must implement.
    pub mandatory_capabilities: &'static [&'static str],
    /// Capability keys a device of this type may additionally implement.
    pub optional_capabilities: &'static [&'static str],
}

/// Lookup table over the built-in catalog.
///
/// Capabilities and device types iterate in catalog definition order, which
/// downstream consumers rely on for deterministic breakdowns.
#[derive(Debug)]
pub struct Registry {
    clusters: HashMap<ClusterId, &'static ClusterMetadata>,
    capabilities: IndexMap<&'static str, &'static CapabilityDef>,
    device_types: IndexMap<DeviceTypeId, &'static DeviceTypeMetadata>,
}

impl Registry {
    /// Build a registry over the standard Matter catalog.
    pub fn standard() -> Self {
        let clusters = catalog::CLUSTERS.iter().map(|c| (c.id, c)).collect();
        let capabilities = catalog::CAPABILITIES.iter().map(|c| (c.key, c)).collect();
        let device_types = catalog::DEVICE_TYPES.iter().map(|d| (d.id, d)).collect();
        Self {
            clusters,
            capabilities,
            device_types,
        }
    }

    /// Look up a cluster by id. Unknown ids return `None`.
    pub fn cluster(&self, id: ClusterId) -> Option<&'static ClusterMetadata> {
        self.clusters.get(&id).copied()
    }

    /// Look up a capability by key. Unknown keys return `None`.
    pub fn capability(&self, key: &str) -> Option<&'static CapabilityDef> {
        self.capabilities.get(key).copied()
    }

    /// Look up a device type by id. Unknown ids return `None`.
    pub fn device_type(&self, id: DeviceTypeId) -> Option<&'static DeviceTypeMetadata> {
        self.device_types.get(&id).copied()
    }

    /// All capabilities in catalog definition order.
    pub fn capabilities(&self) -> impl Iterator<Item = &'static CapabilityDef> + '_ {
        self.capabilities.values().copied()
    }

    /// All device types in catalog definition order.
    pub fn device_types(&self) -> impl Iterator<Item = &'static DeviceTypeMetadata> + '_ {
        self.device_types.values().copied()
    }

    /// All clusters.
    pub fn clusters(&self) -> impl Iterator<Item = &'static ClusterMetadata> + '_ {
        self.clusters.values().copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Display labels and canonical ordering for capability categories.
///
/// Passed explicitly into the analyzer and aggregator so the pure functions
/// stay free of process-wide globals and tests can substitute their own
/// tables.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    labels: IndexMap<CategoryKey, String>,
}

impl CategoryTable {
    pub fn new(labels: IndexMap<CategoryKey, String>) -> Self {
        Self { labels }
    }

    /// Categories in canonical display order.
    pub fn order(&self) -> impl Iterator<Item = CategoryKey> + '_ {
        self.labels.keys().copied()
    }

    /// Display label for a category, falling back to the capitalized key for
    /// categories the table does not name.
    pub fn label(&self, key: CategoryKey) -> String {
        match self.labels.get(&key) {
            Some(label) => label.clone(),
            None => capitalize(&key.to_string()),
        }
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let labels = [
            (CategoryKey::Controls, "Controls"),
            (CategoryKey::Sensors, "Sensors"),
            (CategoryKey::Automation, "Automation"),
            (CategoryKey::Monitoring, "Monitoring"),
            (CategoryKey::Comfort, "Comfort"),
            (CategoryKey::Security, "Security & Safety"),
            (CategoryKey::Media, "Media"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
        Self { labels }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
