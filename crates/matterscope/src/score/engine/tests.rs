use matterscope_registry::Registry;

use super::calculate_device_score;
use crate::score::DeviceScore;
use crate::score::ScoreWeights;
use crate::snapshot::ClusterInstance;
use crate::snapshot::Endpoint;

fn identify_cluster() -> ClusterInstance {
    ClusterInstance::server(0x0003)
        .with_attributes(["IdentifyTime"])
        .with_commands(["Identify"])
}

fn on_off_cluster() -> ClusterInstance {
    ClusterInstance::server(0x0006)
        .with_attributes(["OnOff"])
        .with_commands(["On", "Off", "Toggle"])
}

fn level_cluster() -> ClusterInstance {
    ClusterInstance::server(0x0008)
        .with_attributes(["CurrentLevel"])
        .with_commands(["MoveToLevel"])
}

fn groups_cluster() -> ClusterInstance {
    ClusterInstance::server(0x0004).with_commands(["AddGroup", "RemoveGroup"])
}

fn scenes_cluster() -> ClusterInstance {
    ClusterInstance::server(0x0062).with_commands(["RecallScene"])
}

fn temperature_cluster() -> ClusterInstance {
    ClusterInstance::server(0x0402).with_attributes(["MeasuredValue"])
}

fn humidity_cluster() -> ClusterInstance {
    ClusterInstance::server(0x0405).with_attributes(["MeasuredValue"])
}

/// Dimmable Light with all mandatory capabilities and one of two optionals.
fn dimmable_light() -> Vec<Endpoint> {
    vec![Endpoint::new(1, 0x0101).with_clusters([
        identify_cluster(),
        on_off_cluster(),
        level_cluster(),
        groups_cluster(),
    ])]
}

fn score(endpoints: &[Endpoint]) -> DeviceScore {
    calculate_device_score(endpoints, &Registry::standard(), &ScoreWeights::default())
}

#[test]
fn test_zero_endpoints_yield_zero_score() {
    assert_eq!(score(&[]), DeviceScore::empty());
}

#[test]
fn test_dimmable_light_breakdown() {
    let result = score(&dimmable_light());
    insta::assert_snapshot!(result.to_pretty_string(), @r"
    DeviceScore: score=85.00 stars=4.0 compliant=true
      best spec version: 1.0
      Dimmable Light (0x0101): score=85.00 stars=4 compliant=true
        mandatory=100.00 optional=50.00 bonus=0.00
        [x] on_off required +23.33
        [x] dimming required +23.33
        [x] identify required +23.33
        [x] grouping optional +15.00
        [ ] scenes optional +0.00
    ");
}

#[test]
fn test_half_of_mandatory_scores_fifty_percent_and_fails_compliance() {
    // On/Off Light mandates on_off and identify; only on_off is present.
    let endpoints = vec![Endpoint::new(1, 0x0100).with_clusters([on_off_cluster()])];

    let result = score(&endpoints);
    let type_score = &result.scores_by_type[&0x0100];
    assert_eq!(type_score.mandatory_score, 50.0);
    assert_eq!(type_score.optional_score, 0.0);
    assert!(!type_score.is_compliant);
    assert!(!result.is_compliant);
    assert_eq!(type_score.score, 35.0);
}

#[test]
fn test_compliance_is_a_hard_gate_independent_of_score() {
    // All mandatory present but no optionals: score well below 100, still
    // compliant.
    let endpoints = vec![Endpoint::new(1, 0x0101).with_clusters([
        identify_cluster(),
        on_off_cluster(),
        level_cluster(),
    ])];

    let result = score(&endpoints);
    let type_score = &result.scores_by_type[&0x0101];
    assert_eq!(type_score.score, 70.0);
    assert!(type_score.is_compliant);
    assert!(result.is_compliant);
}

#[test]
fn test_adding_a_capability_never_lowers_the_score() {
    let without_scenes = score(&dimmable_light());

    let mut endpoints = dimmable_light();
    endpoints[0].clusters.push(scenes_cluster());
    let with_scenes = score(&endpoints);

    assert!(with_scenes.overall_score > without_scenes.overall_score);
    assert_eq!(with_scenes.overall_score, 100.0);
    assert_eq!(with_scenes.star_rating, 5.0);
}

#[test]
fn test_client_bonus_is_capped_and_score_stays_bounded() {
    let mut endpoints = dimmable_light();
    endpoints[0].clusters.push(scenes_cluster());
    for cluster_id in [0x0006, 0x0008, 0x0300, 0x0102, 0x0201, 0x0202, 0x0101] {
        endpoints[0].clusters.push(ClusterInstance::client(cluster_id));
    }
    // An unknown client cluster earns nothing.
    endpoints[0].clusters.push(ClusterInstance::client(0xFC00));

    let result = score(&endpoints);
    let type_score = &result.scores_by_type[&0x0101];
    assert_eq!(type_score.client_bonus, 5.0);
    // Already at 100 before the bonus; the clamp holds the ceiling.
    assert_eq!(type_score.score, 100.0);
}

#[test]
fn test_client_bonus_counts_distinct_clusters() {
    let mut endpoints = vec![Endpoint::new(1, 0x0100).with_clusters([
        on_off_cluster(),
        identify_cluster(),
        ClusterInstance::client(0x0006),
        ClusterInstance::client(0x0006),
        ClusterInstance::client(0x0008),
    ])];
    endpoints[0].clusters.push(ClusterInstance::client(0x0008));

    let result = score(&endpoints);
    let type_score = &result.scores_by_type[&0x0100];
    assert_eq!(type_score.client_bonus, 2.0);
    assert_eq!(type_score.score, 72.0);
}

#[test]
fn test_score_tie_resolves_to_first_encountered_type() {
    // Both sensor types reach an identical full score; the earlier endpoint
    // group wins.
    let endpoints = vec![
        Endpoint::new(1, 0x0302).with_clusters([temperature_cluster()]),
        Endpoint::new(2, 0x0307).with_clusters([humidity_cluster()]),
    ];

    let result = score(&endpoints);
    assert_eq!(result.scores_by_type.len(), 2);
    assert_eq!(
        result.scores_by_type[&0x0302].score,
        result.scores_by_type[&0x0307].score
    );
    assert_eq!(result.best_type_score().unwrap().device_type_id, 0x0302);
}

#[test]
fn test_unknown_device_type_is_skipped() {
    let endpoints = vec![
        Endpoint::new(1, 0xFFF0).with_clusters([on_off_cluster()]),
        Endpoint::new(2, 0x0302).with_clusters([temperature_cluster()]),
    ];

    let result = score(&endpoints);
    assert_eq!(result.scores_by_type.len(), 1);
    assert!(result.scores_by_type.contains_key(&0x0302));
}

#[test]
fn test_endpoint_without_clusters_contributes_nothing() {
    let endpoints = vec![Endpoint::new(1, 0x0100)];

    let result = score(&endpoints);
    let type_score = &result.scores_by_type[&0x0100];
    assert_eq!(type_score.mandatory_score, 0.0);
    assert_eq!(type_score.score, 0.0);
    assert!(!type_score.is_compliant);
}

#[test]
fn test_scoring_is_idempotent() {
    let endpoints = dimmable_light();
    assert_eq!(score(&endpoints), score(&endpoints));
}

#[test]
fn test_scores_stay_in_range_across_inputs() {
    let inputs = [
        vec![],
        dimmable_light(),
        vec![Endpoint::new(1, 0x0100)],
        vec![Endpoint::new(1, 0x0022).with_clusters([on_off_cluster(), level_cluster()])],
    ];
    for endpoints in &inputs {
        let result = score(endpoints);
        assert!((0.0..=100.0).contains(&result.overall_score));
        for type_score in result.scores_by_type.values() {
            assert!((0.0..=100.0).contains(&type_score.score));
            assert!(type_score.star_rating <= 5);
        }
    }
}

#[test]
fn test_computed_score_round_trips_through_serde() {
    let result = score(&dimmable_light());
    let encoded = serde_json::to_string(&result).unwrap();
    let decoded: DeviceScore = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, result);
}
