//! End-to-end test over the library: telemetry in JSON wire form, through
//! the store, analyzer, score engine, and compare aggregator.

use std::sync::Arc;

use indexmap::IndexMap;
use matterscope::aggregate_capabilities;
use matterscope::analyze_capabilities;
use matterscope::calculate_device_score;
use matterscope::DeviceScore;
use matterscope::DeviceStore;
use matterscope::Endpoint;
use matterscope::EndpointProvider;
use matterscope::ScoreWeights;
use matterscope_registry::CategoryKey;
use matterscope_registry::CategoryTable;
use matterscope_registry::Registry;

/// An extended color light as a bridge would publish it.
const COLOR_LIGHT_TELEMETRY: &str = r#"[
  {
    "endpoint_id": 1,
    "device_type_id": 269,
    "clusters": [
      {
        "cluster_id": 3,
        "attributes": ["IdentifyTime"],
        "commands": ["Identify"]
      },
      {
        "cluster_id": 6,
        "attributes": ["OnOff", "GlobalSceneControl"],
        "commands": ["On", "Off", "Toggle"]
      },
      {
        "cluster_id": 8,
        "attributes": ["CurrentLevel", "MaxLevel"],
        "commands": ["MoveToLevel"]
      },
      {
        "cluster_id": 768,
        "attributes": ["ColorMode", "ColorTemperatureMireds", "CurrentHue", "CurrentSaturation"],
        "commands": ["MoveToColorTemperature", "MoveToHue"]
      }
    ]
  }
]"#;

/// A contact sensor with a malformed endpoint (no cluster list) thrown in.
const CONTACT_SENSOR_TELEMETRY: &str = r#"[
  {
    "endpoint_id": 1,
    "device_type_id": 21,
    "clusters": [
      { "cluster_id": 69, "attributes": ["StateValue"] }
    ]
  },
  { "endpoint_id": 2, "device_type_id": 21 }
]"#;

#[tokio::test]
async fn test_full_pipeline_from_wire_telemetry() {
    let registry = Registry::standard();
    let categories = CategoryTable::default();
    let weights = ScoreWeights::default();

    let store = Arc::new(DeviceStore::new());
    let light: Vec<Endpoint> = serde_json::from_str(COLOR_LIGHT_TELEMETRY).unwrap();
    let sensor: Vec<Endpoint> = serde_json::from_str(CONTACT_SENSOR_TELEMETRY).unwrap();
    store.replace_endpoints("color-light", light);
    store.replace_endpoints("door-sensor", sensor);

    // Score the light: every mandatory capability of the Extended Color
    // Light type is present, neither optional one is.
    let endpoints = store.endpoints("color-light").await.unwrap();
    let score = calculate_device_score(&endpoints, &registry, &weights);
    assert!(score.is_compliant);
    assert_eq!(score.overall_score, 70.0);
    assert_eq!(score.star_rating, 4.0);
    assert_eq!(score.best_version.as_deref(), Some("1.0"));
    let type_score = &score.scores_by_type[&0x010D];
    assert_eq!(type_score.mandatory_score, 100.0);
    assert_eq!(type_score.optional_score, 0.0);
    assert_eq!(type_score.breakdown.len(), 6);

    // Score the sensor: the empty endpoint contributes nothing but does not
    // break anything.
    let endpoints = store.endpoints("door-sensor").await.unwrap();
    let score = calculate_device_score(&endpoints, &registry, &weights);
    assert!(score.is_compliant);
    assert_eq!(score.scores_by_type[&0x0015].mandatory_score, 100.0);

    // Compare the two devices.
    let mut devices = IndexMap::new();
    for slug in ["color-light", "door-sensor"] {
        let endpoints = store.endpoints(slug).await.unwrap();
        devices.insert(
            slug.to_string(),
            analyze_capabilities(&endpoints, &registry, &categories),
        );
    }
    let matrix = aggregate_capabilities(&devices, &categories);

    let controls = &matrix.by_category[&CategoryKey::Controls];
    assert!(controls.capabilities["color"].has_details);
    assert!(controls.capabilities["color_temperature"].has_details);

    let sensors = &matrix.by_category[&CategoryKey::Sensors];
    assert!(sensors.capabilities["contact"].has_details);
    // Neither device covers occupancy; it survives as a gap row.
    assert!(!sensors.capabilities["occupancy"].has_details);

    // Categories come out in canonical order.
    let order: Vec<_> = matrix.by_category.keys().copied().collect();
    assert_eq!(order.first(), Some(&CategoryKey::Controls));
}

#[tokio::test]
async fn test_score_survives_cache_round_trip() {
    let store = DeviceStore::new();
    let light: Vec<Endpoint> = serde_json::from_str(COLOR_LIGHT_TELEMETRY).unwrap();
    store.replace_endpoints("color-light", light);

    let endpoints = store.endpoints("color-light").await.unwrap();
    let score = calculate_device_score(
        &endpoints,
        &Registry::standard(),
        &ScoreWeights::default(),
    );

    // Encode as a cache layer would, decode, and compare field-for-field.
    let cached = serde_json::to_vec(&score).unwrap();
    let restored: DeviceScore = serde_json::from_slice(&cached).unwrap();
    assert_eq!(restored, score);

    // Recomputing from the same endpoints gives the identical value.
    let recomputed = calculate_device_score(
        &endpoints,
        &Registry::standard(),
        &ScoreWeights::default(),
    );
    assert_eq!(recomputed, score);
}
