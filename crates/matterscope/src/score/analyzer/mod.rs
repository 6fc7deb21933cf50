//! Capability analyzer.
//!
//! Consumes raw endpoint/cluster telemetry and produces an `AnalyzerResult`:
//! per category, the capabilities the device supports and the standard
//! capabilities it lacks. Unknown cluster ids are skipped so one malformed
//! cluster never aborts the analysis.

use std::collections::HashSet;

use indexmap::IndexMap;
use matterscope_registry::CapabilityDef;
use matterscope_registry::CategoryKey;
use matterscope_registry::CategoryTable;
use matterscope_registry::ClusterMetadata;
use matterscope_registry::Registry;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::snapshot::ClusterInstance;
use crate::snapshot::ClusterSide;
use crate::snapshot::Endpoint;


/// A capability as reported for one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub key: String,
    pub label: String,
    pub emoji: String,
    pub category: CategoryKey,
    pub spec_version: String,
    /// True when the device reported attribute data worth a detail view.
    pub has_details: bool,
}

impl Capability {
    fn from_def(def: &CapabilityDef, has_details: bool) -> Self {
        Self {
            key: def.key.to_string(),
            label: def.label.to_string(),
            emoji: def.emoji.to_string(),
            category: def.category,
            spec_version: def.spec_version.to_string(),
            has_details,
        }
    }
}

/// Supported and missing capabilities of one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCapabilities {
    pub label: String,
    pub supported: IndexMap<String, Capability>,
    pub unsupported: IndexMap<String, Capability>,
}

impl CategoryCapabilities {
    fn is_empty(&self) -> bool {
        self.supported.is_empty() && self.unsupported.is_empty()
    }
}

/// Full analysis of one device's telemetry, grouped by category in canonical
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub by_category: IndexMap<CategoryKey, CategoryCapabilities>,
}

impl AnalyzerResult {
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }

    /// Render the analysis for debugging and snapshot tests.
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        for (key, bucket) in &self.by_category {
            out.push_str(&format!("[{}] {}\n", key, bucket.label));
            for capability in bucket.supported.values() {
                out.push_str(&format!(
                    "  + {}{}\n",
                    capability.key,
                    if capability.has_details {
                        " (details)"
                    } else {
                        ""
                    }
                ));
            }
            for capability in bucket.unsupported.values() {
                out.push_str(&format!("  - {}\n", capability.key));
            }
        }
        out
    }
}

/// Classify a device's telemetry into supported and unsupported capabilities
/// per category.
pub fn analyze_capabilities(
    endpoints: &[Endpoint],
    registry: &Registry,
    categories: &CategoryTable,
) -> AnalyzerResult {
    for endpoint in endpoints {
        for instance in &endpoint.clusters {
            if registry.cluster(instance.cluster_id).is_none() {
                debug!(
                    cluster_id = instance.cluster_id,
                    endpoint_id = endpoint.endpoint_id,
                    "skipping unknown cluster"
                );
            }
        }
    }

    let referenced = referenced_capabilities(registry);

    // Pre-seed buckets in canonical order; anything outside the table lands
    // behind them in first-appearance order.
    let mut by_category: IndexMap<CategoryKey, CategoryCapabilities> = categories
        .order()
        .map(|key| {
            (
                key,
                CategoryCapabilities {
                    label: categories.label(key),
                    ..Default::default()
                },
            )
        })
        .collect();

    for def in registry.capabilities() {
        let backing = backing_instance(endpoints, def, registry);
        let supported = backing.is_some();
        let capability = match backing {
            Some(instance) => Capability::from_def(def, !instance.attributes.is_empty()),
            None if referenced.contains(def.key) => Capability::from_def(def, false),
            None => continue,
        };

        let bucket = by_category
            .entry(def.category)
            .or_insert_with(|| CategoryCapabilities {
                label: categories.label(def.category),
                ..Default::default()
            });
        if supported {
            bucket.supported.insert(def.key.to_string(), capability);
        } else {
            bucket.unsupported.insert(def.key.to_string(), capability);
        }
    }

    by_category.retain(|_, bucket| !bucket.is_empty());
    AnalyzerResult { by_category }
}

/// Capability keys any device type lists as mandatory or optional. These are
/// the "standard" capabilities shown as gaps in comparison tables.
fn referenced_capabilities(registry: &Registry) -> HashSet<&'static str> {
    registry
        .device_types()
        .flat_map(|d| {
            d.mandatory_capabilities
                .iter()
                .chain(d.optional_capabilities)
        })
        .copied()
        .collect()
}

/// First server-side instance of the capability's defining cluster that
/// carries every element the cluster and the capability mandate.
fn backing_instance<'a, I>(
    endpoints: I,
    def: &CapabilityDef,
    registry: &Registry,
) -> Option<&'a ClusterInstance>
where
    I: IntoIterator<Item = &'a Endpoint>,
{
    let cluster = registry.cluster(def.cluster)?;
    endpoints
        .into_iter()
        .flat_map(|endpoint| endpoint.clusters.iter())
        .find(|instance| instance_satisfies(instance, def, cluster))
}

fn instance_satisfies(
    instance: &ClusterInstance,
    def: &CapabilityDef,
    cluster: &ClusterMetadata,
) -> bool {
    instance.cluster_id == def.cluster
        && instance.side == ClusterSide::Server
        && has_all(&instance.attributes, cluster.mandatory_attributes)
        && has_all(&instance.attributes, def.required_attributes)
        && has_all(&instance.commands, cluster.mandatory_commands)
        && has_all(&instance.commands, def.required_commands)
}

fn has_all(present: &[String], required: &[&str]) -> bool {
    required.iter().all(|r| present.iter().any(|p| p == r))
}

/// Whether the endpoint set implements a capability, by the same rule the
/// analyzer classifies with. Unknown keys count as absent.
pub(crate) fn capability_present<'a, I>(endpoints: I, key: &str, registry: &Registry) -> bool
where
    I: IntoIterator<Item = &'a Endpoint>,
{
    match registry.capability(key) {
        Some(def) => backing_instance(endpoints, def, registry).is_some(),
        None => false,
    }
}
