//! Device score engine.
//!
//! Computes per-device-type compliance scores from raw endpoint telemetry
//! and aggregates them into a `DeviceScore`. Total over its input: empty
//! telemetry yields the zero score, unknown device types are skipped, and
//! nothing here returns an error.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use matterscope_registry::DeviceTypeId;
use matterscope_registry::DeviceTypeMetadata;
use matterscope_registry::Registry;
use tracing::debug;

use super::analyzer::capability_present;
use super::star_rating_for;
use super::CapabilityContribution;
use super::DeviceScore;
use super::DeviceTypeScore;
use super::ScoreWeights;
use crate::snapshot::ClusterSide;
use crate::snapshot::Endpoint;

#[cfg(test)]
mod tests;

/// Score a device's telemetry against every device type its endpoints claim.
pub fn calculate_device_score(
    endpoints: &[Endpoint],
    registry: &Registry,
    weights: &ScoreWeights,
) -> DeviceScore {
    // Group by device type, preserving first-encounter order: score ties
    // between types resolve to the earliest group.
    let mut groups: IndexMap<DeviceTypeId, Vec<&Endpoint>> = IndexMap::new();
    for endpoint in endpoints {
        groups
            .entry(endpoint.device_type_id)
            .or_default()
            .push(endpoint);
    }

    let mut scores_by_type = IndexMap::new();
    for (device_type_id, group) in &groups {
        let Some(metadata) = registry.device_type(*device_type_id) else {
            debug!(
                device_type_id = *device_type_id,
                "skipping unknown device type"
            );
            continue;
        };
        scores_by_type.insert(
            *device_type_id,
            score_device_type(metadata, group, registry, weights),
        );
    }

    let mut score = DeviceScore {
        overall_score: 0.0,
        star_rating: 0.0,
        is_compliant: false,
        scores_by_type,
        best_version: None,
    };
    let best = score
        .best_type_score()
        .map(|b| (b.score, b.star_rating, b.is_compliant, b.device_type_id));
    if let Some((best_score, stars, compliant, device_type_id)) = best {
        score.overall_score = best_score;
        score.star_rating = f64::from(stars);
        score.is_compliant = compliant;
        score.best_version = registry
            .device_type(device_type_id)
            .map(|m| m.spec_version.to_string());
    }
    score
}

fn score_device_type(
    metadata: &DeviceTypeMetadata,
    group: &[&Endpoint],
    registry: &Registry,
    weights: &ScoreWeights,
) -> DeviceTypeScore {
    let mandatory_total = metadata.mandatory_capabilities.len();
    let optional_total = metadata.optional_capabilities.len();
    let mut mandatory_present = 0usize;
    let mut optional_present = 0usize;
    let mut breakdown = Vec::with_capacity(mandatory_total + optional_total);

    for key in metadata.mandatory_capabilities {
        let present = capability_present(group.iter().copied(), key, registry);
        if present {
            mandatory_present += 1;
        }
        breakdown.push(CapabilityContribution {
            capability_key: key.to_string(),
            required: true,
            present,
            contribution: if present {
                weights.mandatory * 100.0 / mandatory_total as f64
            } else {
                0.0
            },
        });
    }

    for key in metadata.optional_capabilities {
        let present = capability_present(group.iter().copied(), key, registry);
        if present {
            optional_present += 1;
        }
        breakdown.push(CapabilityContribution {
            capability_key: key.to_string(),
            required: false,
            present,
            contribution: if present {
                weights.optional * 100.0 / optional_total as f64
            } else {
                0.0
            },
        });
    }

    // Denominators come from the registry, never from the telemetry, so
    // adding a capability can only raise the percentages. A type that
    // defines no capabilities of a class gets full marks for that class.
    let mandatory_score = if mandatory_total == 0 {
        100.0
    } else {
        mandatory_present as f64 * 100.0 / mandatory_total as f64
    };
    let optional_score = if optional_total == 0 {
        100.0
    } else {
        optional_present as f64 * 100.0 / optional_total as f64
    };

    let client_bonus = client_bonus(group, registry, weights);
    let score = (mandatory_score * weights.mandatory
        + optional_score * weights.optional
        + client_bonus)
        .clamp(0.0, 100.0);

    DeviceTypeScore {
        device_type_id: metadata.id,
        device_type_name: metadata.name.to_string(),
        score,
        star_rating: star_rating_for(score),
        is_compliant: mandatory_present == mandatory_total,
        mandatory_score,
        optional_score,
        client_bonus,
        breakdown,
    }
}

/// Bonus for controller-side capabilities beyond the minimum server role:
/// a fixed amount per distinct registry-known client cluster, bounded by
/// `client_bonus_max`. The final clamp keeps the total score at 100.
fn client_bonus(group: &[&Endpoint], registry: &Registry, weights: &ScoreWeights) -> f64 {
    let mut clusters = BTreeSet::new();
    for endpoint in group {
        for instance in &endpoint.clusters {
            if instance.side == ClusterSide::Client && registry.cluster(instance.cluster_id).is_some()
            {
                clusters.insert(instance.cluster_id);
            }
        }
    }
    (clusters.len() as f64 * weights.client_bonus_per_cluster).min(weights.client_bonus_max)
}
