//! Threshold-and-rank scenario classifier
//!
//! Decision protocol:
//! 1. Score each anomaly scenario as the weighted sum of its profile's
//!    feature deviations (non-negative, monotone per feature).
//! 2. Normal = max(0, 1 − Σ anomaly scores); normalize the four scores
//!    into a distribution (all-zero anomalies ⇒ Normal = 1).
//! 3. The highest-scoring scenario wins; confidence = its normalized score.
//! 4. Override to Unknown when mandatory windowed features are unavailable
//!    for the winner, or when confidence falls below the configured
//!    minimum. The unresolved score is kept as the confidence.
//! 5. Contributing features = top weighted contributions to the winning
//!    scenario, descending, ties broken by feature declaration order.
//!
//! The classifier is total over well-formed feature vectors and never
//! raises. Its interface is the swap point for a statistical model: replace
//! `ScenarioClassifier::classify` and nothing upstream or downstream moves.

use super::profiles::{build_profiles, ScenarioProfile};
use crate::config::TurbineConfig;
use crate::types::{ConfidenceTier, FeatureVector, Scenario};

/// Classifier verdict for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub scenario: Scenario,
    /// Normalized confidence in [0, 1]
    pub confidence: f64,
    /// Feature names ranked by contribution to the winning scenario
    pub contributing_features: Vec<String>,
    /// Urgency tier derived from the final confidence
    pub tier: ConfidenceTier,
}

/// Threshold-and-rank classifier over the configured scenario profiles.
pub struct ScenarioClassifier<'a> {
    config: &'a TurbineConfig,
    profiles: Vec<ScenarioProfile>,
}

impl<'a> ScenarioClassifier<'a> {
    pub fn new(config: &'a TurbineConfig) -> Self {
        Self {
            config,
            profiles: build_profiles(config),
        }
    }

    /// Raw (unnormalized) anomaly scores, in profile order.
    pub fn raw_scores(&self, fv: &FeatureVector) -> Vec<(Scenario, f64)> {
        let cut_in = self.config.turbine.cut_in_wind_speed_ms;
        self.profiles
            .iter()
            .map(|p| (p.scenario, p.score(fv, cut_in)))
            .collect()
    }

    /// Classify one feature vector.
    pub fn classify(&self, fv: &FeatureVector) -> Classification {
        let cut_in = self.config.turbine.cut_in_wind_speed_ms;
        let decision = &self.config.decision;

        let raw = self.raw_scores(fv);
        let anomaly_sum: f64 = raw.iter().map(|(_, s)| s).sum();
        let normal = (1.0 - anomaly_sum).max(0.0);
        let total = normal + anomaly_sum;

        if !total.is_finite() || total <= 0.0 {
            debug_assert!(false, "score normalization degenerate: total = {total}");
            tracing::error!(
                total,
                anomaly_sum,
                "Scenario score normalization degenerate — degrading to Unknown"
            );
            return Classification {
                scenario: Scenario::Unknown,
                confidence: 0.0,
                contributing_features: Vec::new(),
                tier: ConfidenceTier::Low,
            };
        }

        // Winner selection over the normalized distribution. Fixed candidate
        // order (Normal first, then profile order) makes exact ties
        // deterministic.
        let mut winner = Scenario::NormalOperation;
        let mut winner_score = normal / total;
        for (scenario, score) in &raw {
            let normalized = score / total;
            if normalized > winner_score {
                winner = *scenario;
                winner_score = normalized;
            }
        }

        let contributing_features = if winner.is_normal() {
            Vec::new()
        } else {
            self.ranked_contributions(winner, fv, cut_in)
        };

        // Unknown overrides: unresolvable winner (window too short), then
        // the confidence floor. The unresolved score is kept so the caller
        // can see how close the call was.
        let mut scenario = winner;
        if !winner.is_normal() {
            let profile = self.profiles.iter().find(|p| p.scenario == winner);
            if let Some(profile) = profile {
                if !profile.window_features_available(fv) {
                    tracing::debug!(
                        winner = %winner,
                        window_len = fv.window_len,
                        "Winning scenario needs windowed features — resolving to Unknown"
                    );
                    scenario = Scenario::Unknown;
                }
            }
        }
        if winner_score < decision.min_confidence {
            scenario = Scenario::Unknown;
        }

        let tier = if winner_score >= decision.high_confidence {
            ConfidenceTier::High
        } else if winner_score >= decision.min_confidence {
            ConfidenceTier::Moderate
        } else {
            ConfidenceTier::Low
        };

        Classification {
            scenario,
            confidence: winner_score,
            contributing_features,
            tier,
        }
    }

    /// Top contributing feature names for a scenario, by descending weighted
    /// contribution; ties resolved by feature declaration order.
    fn ranked_contributions(
        &self,
        scenario: Scenario,
        fv: &FeatureVector,
        cut_in: f64,
    ) -> Vec<String> {
        let Some(profile) = self.profiles.iter().find(|p| p.scenario == scenario) else {
            return Vec::new();
        };

        let mut contributions: Vec<(&'static str, f64)> = profile
            .term_contributions(fv, cut_in)
            .into_iter()
            .filter(|(_, c)| *c > 0.0)
            .collect();

        contributions.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    FeatureVector::declaration_index(a.0)
                        .cmp(&FeatureVector::declaration_index(b.0))
                })
        });

        contributions
            .into_iter()
            .take(self.config.decision.max_contributing_features)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
