//! Scenario reference profiles
//!
//! Each anomaly scenario is described by a profile: a set of weighted
//! deviation terms over named features. A term accrues evidence as its
//! feature moves past the configured threshold in the anomalous direction,
//! normalized by a scale. Missing features contribute zero evidence, so a
//! sensor dropout can never push a scenario score up.

use crate::config::TurbineConfig;
use crate::types::{feature_names, FeatureVector, Scenario};

/// Direction in which a feature deviates for a given scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Evidence accrues as the feature rises above the threshold
    Above,
    /// Evidence accrues as the feature falls below the threshold
    Below,
}

/// One weighted deviation term of a scenario profile.
#[derive(Debug, Clone)]
pub struct ProfileTerm {
    pub feature: &'static str,
    pub direction: Direction,
    pub threshold: f64,
    pub scale: f64,
    pub weight: f64,
    /// Only count this term while the wind is above cut-in: without wind
    /// there is no expectation of output, so low power is not evidence.
    pub gated_on_cut_in: bool,
}

impl ProfileTerm {
    /// Weighted non-negative evidence from one feature value.
    pub fn contribution(&self, value: f64) -> f64 {
        let excess = match self.direction {
            Direction::Above => (value - self.threshold) / self.scale,
            Direction::Below => (self.threshold - value) / self.scale,
        };
        self.weight * excess.max(0.0)
    }
}

/// Reference profile for one anomaly scenario.
#[derive(Debug, Clone)]
pub struct ScenarioProfile {
    pub scenario: Scenario,
    pub terms: Vec<ProfileTerm>,
    /// Windowed features this scenario cannot be resolved without. When any
    /// of these are unavailable (batch too short) and the scenario would
    /// win, the result is overridden to Unknown.
    pub mandatory_window_features: Vec<&'static str>,
}

impl ScenarioProfile {
    /// Raw (unnormalized) match score for a feature vector.
    ///
    /// Sum of weighted non-negative deviations; always >= 0 and monotone
    /// non-decreasing in each feature's anomalous direction.
    pub fn score(&self, fv: &FeatureVector, cut_in_wind_speed_ms: f64) -> f64 {
        self.term_contributions(fv, cut_in_wind_speed_ms)
            .iter()
            .map(|(_, c)| c)
            .sum()
    }

    /// Per-term weighted contributions (feature name, evidence).
    /// Missing features and gated-out terms contribute zero.
    pub fn term_contributions(
        &self,
        fv: &FeatureVector,
        cut_in_wind_speed_ms: f64,
    ) -> Vec<(&'static str, f64)> {
        // Persistence gate: prefer the rolling mean when the window has one,
        // fall back to the instantaneous reading for single records.
        let effective_wind = fv.wind_speed_mean.or(fv.wind_speed);

        self.terms
            .iter()
            .map(|term| {
                if term.gated_on_cut_in
                    && !effective_wind.is_some_and(|w| w > cut_in_wind_speed_ms)
                {
                    return (term.feature, 0.0);
                }
                let contribution = fv.get(term.feature).map_or(0.0, |v| term.contribution(v));
                (term.feature, contribution)
            })
            .collect()
    }

    /// Whether all window-mandatory features are present in the vector.
    pub fn window_features_available(&self, fv: &FeatureVector) -> bool {
        self.mandatory_window_features
            .iter()
            .all(|name| fv.get(name).is_some())
    }
}

/// Build the three anomaly profiles from configuration. Profile order is
/// fixed (Power Regulation, Gearbox Wear, Yaw Degradation) and is part of
/// the deterministic tie-break contract.
pub fn build_profiles(config: &TurbineConfig) -> Vec<ScenarioProfile> {
    let t = &config.thresholds;
    let w = &config.profiles;

    vec![
        ScenarioProfile {
            scenario: Scenario::PowerRegulation,
            terms: vec![
                ProfileTerm {
                    feature: feature_names::LOAD_FACTOR,
                    direction: Direction::Below,
                    threshold: t.power.nominal_load_factor,
                    scale: t.power.load_factor_scale,
                    weight: w.power.load_factor_weight,
                    gated_on_cut_in: true,
                },
                ProfileTerm {
                    feature: feature_names::PITCH_POWER_RATIO,
                    direction: Direction::Above,
                    threshold: t.power.pitch_ratio_warning,
                    scale: t.power.pitch_ratio_scale,
                    weight: w.power.pitch_ratio_weight,
                    gated_on_cut_in: true,
                },
            ],
            mandatory_window_features: Vec::new(),
        },
        ScenarioProfile {
            scenario: Scenario::GearboxBearingWear,
            terms: vec![
                ProfileTerm {
                    feature: feature_names::GEARBOX_TEMP_DELTA,
                    direction: Direction::Above,
                    threshold: t.gearbox.temp_delta_warning_c,
                    scale: t.gearbox.temp_delta_scale_c,
                    weight: w.gearbox.temp_delta_weight,
                    gated_on_cut_in: false,
                },
                ProfileTerm {
                    feature: feature_names::GEAR_BEAR_TEMP_TREND,
                    direction: Direction::Above,
                    threshold: t.gearbox.bearing_trend_warning_c,
                    scale: t.gearbox.bearing_trend_scale_c,
                    weight: w.gearbox.bearing_trend_weight,
                    gated_on_cut_in: false,
                },
                ProfileTerm {
                    feature: feature_names::PHASE_TEMP_SPREAD,
                    direction: Direction::Above,
                    threshold: t.electrical.phase_spread_warning_c,
                    scale: t.electrical.phase_spread_scale_c,
                    weight: w.gearbox.phase_spread_weight,
                    gated_on_cut_in: false,
                },
            ],
            mandatory_window_features: Vec::new(),
        },
        ScenarioProfile {
            scenario: Scenario::YawBearingDegradation,
            terms: vec![
                ProfileTerm {
                    feature: feature_names::YAW_MISALIGNMENT,
                    direction: Direction::Above,
                    threshold: t.yaw.misalignment_warning_deg,
                    scale: t.yaw.misalignment_scale_deg,
                    weight: w.yaw.misalignment_weight,
                    gated_on_cut_in: false,
                },
                ProfileTerm {
                    feature: feature_names::YAW_MISALIGNMENT_TREND,
                    direction: Direction::Above,
                    threshold: t.yaw.trend_warning_deg,
                    scale: t.yaw.trend_scale_deg,
                    weight: w.yaw.trend_weight,
                    gated_on_cut_in: false,
                },
            ],
            // Degradation is a sustained condition: a single snapshot of
            // misalignment cannot resolve it.
            mandatory_window_features: vec![feature_names::YAW_MISALIGNMENT_TREND],
        },
    ]
}
