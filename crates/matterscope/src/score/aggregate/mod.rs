//! Compare aggregator.
//!
//! Merges several devices' analyzer results into one comparison matrix. The
//! merge is two explicit passes: metadata capture (first write wins), then a
//! `has_details` upgrade sweep. Keeping the passes separate avoids the
//! order-dependent bugs a single fold invites.

use indexmap::IndexMap;
use matterscope_registry::CategoryKey;
use matterscope_registry::CategoryTable;
use serde::Deserialize;
use serde::Serialize;

use super::analyzer::AnalyzerResult;


/// Union metadata for one capability across all compared devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityMeta {
    pub key: String,
    pub label: String,
    pub emoji: String,
    pub spec_version: String,
    /// True once any device reported the capability supported with details.
    pub has_details: bool,
}

/// One category row of the comparison matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCategory {
    pub label: String,
    pub capabilities: IndexMap<String, CapabilityMeta>,
}

/// Cross-device comparison matrix, categories in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    pub by_category: IndexMap<CategoryKey, ComparisonCategory>,
}

/// Merge per-device capability sets keyed by device slug.
///
/// Devices are visited in the map's insertion order, which makes the merge
/// deterministic for a given request. Callers bound the number of devices;
/// no size validation happens here.
pub fn aggregate_capabilities(
    devices: &IndexMap<String, AnalyzerResult>,
    categories: &CategoryTable,
) -> ComparisonMatrix {
    // Pass 1: union every capability key, first write wins for metadata.
    // Category and capability insertion order record first appearance.
    let mut merged: IndexMap<CategoryKey, IndexMap<String, CapabilityMeta>> = IndexMap::new();
    for result in devices.values() {
        for (category, bucket) in &result.by_category {
            let capabilities = merged.entry(*category).or_default();
            for capability in bucket.supported.values().chain(bucket.unsupported.values()) {
                capabilities
                    .entry(capability.key.clone())
                    .or_insert_with(|| CapabilityMeta {
                        key: capability.key.clone(),
                        label: capability.label.clone(),
                        emoji: capability.emoji.clone(),
                        spec_version: capability.spec_version.clone(),
                        has_details: false,
                    });
            }
        }
    }

    // Pass 2: upgrade has_details wherever any device supported the
    // capability with details. Only this flag is ever rewritten.
    for result in devices.values() {
        for (category, bucket) in &result.by_category {
            for capability in bucket.supported.values() {
                if capability.has_details {
                    if let Some(meta) = merged
                        .get_mut(category)
                        .and_then(|capabilities| capabilities.get_mut(&capability.key))
                    {
                        meta.has_details = true;
                    }
                }
            }
        }
    }

    // Canonical categories first, then the rest in first-appearance order.
    let mut by_category = IndexMap::new();
    for key in categories.order() {
        if let Some(capabilities) = merged.shift_remove(&key) {
            if !capabilities.is_empty() {
                by_category.insert(
                    key,
                    ComparisonCategory {
                        label: categories.label(key),
                        capabilities,
                    },
                );
            }
        }
    }
    for (key, capabilities) in merged {
        if !capabilities.is_empty() {
            by_category.insert(
                key,
                ComparisonCategory {
                    label: categories.label(key),
                    capabilities,
                },
            );
        }
    }

    ComparisonMatrix { by_category }
}
