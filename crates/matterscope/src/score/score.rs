use indexmap::IndexMap;
use matterscope_registry::DeviceTypeId;
use serde::Deserialize;
use serde::Serialize;

/// Weighting of the score formula.
///
/// The mandatory/optional split is fixed at 70/30; it can be tuned through
/// `[scoring]` config but stays constant for the lifetime of the process so
/// scores remain comparable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Weight of the mandatory-capability percentage.
    pub mandatory: f64,
    /// Weight of the optional-capability percentage.
    pub optional: f64,
    /// Bonus per distinct client-side cluster the registry knows.
    pub client_bonus_per_cluster: f64,
    /// Upper bound on the total client bonus.
    pub client_bonus_max: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            mandatory: 0.70,
            optional: 0.30,
            client_bonus_per_cluster: 1.0,
            client_bonus_max: 5.0,
        }
    }
}

/// One line of a score breakdown: did the device bring this capability, and
/// how much of the score did it earn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityContribution {
    pub capability_key: String,
    pub required: bool,
    pub present: bool,
    pub contribution: f64,
}

/// Compliance score of a device against one device type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeScore {
    pub device_type_id: DeviceTypeId,
    pub device_type_name: String,
    pub score: f64,
    /// 0-5 stars derived from `score`.
    pub star_rating: u8,
    /// True iff every mandatory capability is present. A hard gate,
    /// independent of the numeric score.
    pub is_compliant: bool,
    pub mandatory_score: f64,
    pub optional_score: f64,
    pub client_bonus: f64,
    pub breakdown: Vec<CapabilityContribution>,
}

/// Aggregate score of a device over all device types its endpoints claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceScore {
    pub overall_score: f64,
    pub star_rating: f64,
    pub is_compliant: bool,
    pub scores_by_type: IndexMap<DeviceTypeId, DeviceTypeScore>,
    /// Spec version of the best-scoring device type.
    pub best_version: Option<String>,
}

impl DeviceScore {
    /// The well-defined score of a device with no scoreable endpoints.
    pub fn empty() -> Self {
        Self {
            overall_score: 0.0,
            star_rating: 0.0,
            is_compliant: false,
            scores_by_type: IndexMap::new(),
            best_version: None,
        }
    }

    /// Best-scoring device type. Ties resolve to the first-encountered type
    /// because the comparison is strictly greater and `scores_by_type`
    /// preserves insertion order.
    pub fn best_type_score(&self) -> Option<&DeviceTypeScore> {
        let mut best: Option<&DeviceTypeScore> = None;
        for candidate in self.scores_by_type.values() {
            if best.map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Render the score for debugging and snapshot tests.
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "DeviceScore: score={:.2} stars={:.1} compliant={}\n",
            self.overall_score, self.star_rating, self.is_compliant
        ));
        if let Some(version) = &self.best_version {
            out.push_str(&format!("  best spec version: {}\n", version));
        }
        for type_score in self.scores_by_type.values() {
            out.push_str(&type_score.to_pretty_string());
        }
        out
    }
}

impl DeviceTypeScore {
    pub fn to_pretty_string(&self) -> String {
        let mut out = format!(
            "  {} ({:#06x}): score={:.2} stars={} compliant={}\n    mandatory={:.2} optional={:.2} bonus={:.2}\n",
            self.device_type_name,
            self.device_type_id,
            self.score,
            self.star_rating,
            self.is_compliant,
            self.mandatory_score,
            self.optional_score,
            self.client_bonus,
        );
        for item in &self.breakdown {
            out.push_str(&format!(
                "    [{}] {} {} +{:.2}\n",
                if item.present { "x" } else { " " },
                item.capability_key,
                if item.required { "required" } else { "optional" },
                item.contribution,
            ));
        }
        out
    }
}

/// Stars for a 0-100 score, clamped to [0, 5].
pub(crate) fn star_rating_for(score: f64) -> u8 {
    ((score / 20.0).round() as i64).clamp(0, 5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_rating_boundaries() {
        assert_eq!(star_rating_for(0.0), 0);
        assert_eq!(star_rating_for(9.9), 0);
        assert_eq!(star_rating_for(10.0), 1);
        assert_eq!(star_rating_for(50.0), 3);
        assert_eq!(star_rating_for(89.9), 4);
        assert_eq!(star_rating_for(90.0), 5);
        assert_eq!(star_rating_for(100.0), 5);
    }

    #[test]
    fn test_empty_score_shape() {
        let score = DeviceScore::empty();
        assert_eq!(score.overall_score, 0.0);
        assert_eq!(score.star_rating, 0.0);
        assert!(!score.is_compliant);
        assert!(score.scores_by_type.is_empty());
        assert!(score.best_version.is_none());
        assert!(score.best_type_score().is_none());
    }

    #[test]
    fn test_device_score_round_trip() {
        let mut scores_by_type = IndexMap::new();
        scores_by_type.insert(
            0x0101,
            DeviceTypeScore {
                device_type_id: 0x0101,
                device_type_name: "Dimmable Light".to_string(),
                score: 87.5,
                star_rating: 4,
                is_compliant: true,
                mandatory_score: 100.0,
                optional_score: 50.0,
                client_bonus: 2.5,
                breakdown: vec![
                    CapabilityContribution {
                        capability_key: "on_off".to_string(),
                        required: true,
                        present: true,
                        contribution: 23.333333333333332,
                    },
                    CapabilityContribution {
                        capability_key: "scenes".to_string(),
                        required: false,
                        present: false,
                        contribution: 0.0,
                    },
                ],
            },
        );
        let score = DeviceScore {
            overall_score: 87.5,
            star_rating: 4.0,
            is_compliant: true,
            scores_by_type,
            best_version: Some("1.0".to_string()),
        };

        let encoded = serde_json::to_value(&score).unwrap();
        let decoded: DeviceScore = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, score);
    }

    #[test]
    fn test_best_type_score_tie_keeps_first() {
        let make = |id: DeviceTypeId, name: &str, score: f64| DeviceTypeScore {
            device_type_id: id,
            device_type_name: name.to_string(),
            score,
            star_rating: star_rating_for(score),
            is_compliant: false,
            mandatory_score: score,
            optional_score: 0.0,
            client_bonus: 0.0,
            breakdown: Vec::new(),
        };

        let mut scores_by_type = IndexMap::new();
        scores_by_type.insert(0x0100, make(0x0100, "On/Off Light", 70.0));
        scores_by_type.insert(0x0101, make(0x0101, "Dimmable Light", 70.0));
        let score = DeviceScore {
            overall_score: 70.0,
            star_rating: 4.0,
            is_compliant: false,
            scores_by_type,
            best_version: None,
        };

        assert_eq!(score.best_type_score().unwrap().device_type_id, 0x0100);
    }
}
