//! Recommendation Engine
//!
//! Maps (scenario, confidence tier, salient feature) to 1-4 actionable
//! maintenance recommendations. The table is total — every scenario × tier
//! combination yields at least one line — so a non-Normal result can never
//! come back without guidance. Recommendation text interpolates the actual
//! metric values so the maintenance planner sees numbers, not categories.

use crate::config::TurbineConfig;
use crate::types::{feature_names, ConfidenceTier, FeatureVector, Scenario};

/// Maximum recommendations per result.
const MAX_RECOMMENDATIONS: usize = 4;

/// Fixed-table recommendation generator, refined by confidence tier and by
/// which contributing feature dominates the verdict.
pub struct RecommendationEngine<'a> {
    config: &'a TurbineConfig,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(config: &'a TurbineConfig) -> Self {
        Self { config }
    }

    /// Build the recommendation list for one classification.
    ///
    /// `contributing` is the ranked contributing-feature list from the
    /// classifier; its head picks the lead action.
    pub fn recommend(
        &self,
        scenario: Scenario,
        tier: ConfidenceTier,
        contributing: &[String],
        fv: &FeatureVector,
    ) -> Vec<String> {
        let top = contributing.first().map(String::as_str);
        let mut recs = match scenario {
            Scenario::NormalOperation => normal_recommendations(),
            Scenario::PowerRegulation => power_regulation_recommendations(tier, fv),
            Scenario::GearboxBearingWear => gearbox_recommendations(tier, top, fv),
            Scenario::YawBearingDegradation => yaw_recommendations(tier, fv),
            Scenario::Unknown => unknown_recommendations(fv, self.config),
        };
        recs.truncate(MAX_RECOMMENDATIONS);
        recs
    }
}

fn normal_recommendations() -> Vec<String> {
    vec!["No action required — continue scheduled condition monitoring".to_string()]
}

fn gearbox_recommendations(
    tier: ConfidenceTier,
    top_feature: Option<&str>,
    fv: &FeatureVector,
) -> Vec<String> {
    let delta_note = fv
        .gearbox_temp_delta
        .map(|d| format!(" (bearing running {d:.1} °C above oil sump)"))
        .unwrap_or_default();

    // Oil before vibration when the thermal signature leads; vibration
    // first when the electrical side (phase spread) dominates.
    let thermal_lead = matches!(
        top_feature,
        None | Some(feature_names::GEARBOX_TEMP_DELTA)
            | Some(feature_names::GEAR_BEAR_TEMP_TREND)
    );

    let mut recs = Vec::new();
    match tier {
        ConfidenceTier::High => {
            recs.push(format!(
                "Schedule gearbox bearing maintenance within 30 days{delta_note}"
            ));
            if thermal_lead {
                recs.push("Check gearbox oil quality and viscosity; sample for metal particles".to_string());
                recs.push("Arrange vibration analysis of the gearbox bearing train".to_string());
            } else {
                recs.push("Arrange vibration analysis of the gearbox bearing train".to_string());
                recs.push("Check gearbox oil quality and viscosity; sample for metal particles".to_string());
            }
            recs.push("Monitor gearbox bearing temperature closely until inspection".to_string());
        }
        ConfidenceTier::Moderate | ConfidenceTier::Low => {
            recs.push(format!(
                "Increase gearbox temperature monitoring frequency{delta_note}"
            ));
            if thermal_lead {
                recs.push("Check gearbox oil level and cooling circuit at next site visit".to_string());
            } else {
                recs.push("Inspect generator phase balance at next site visit".to_string());
            }
            recs.push("Plan preventive gearbox maintenance at the next scheduled service".to_string());
        }
    }
    recs
}

fn yaw_recommendations(tier: ConfidenceTier, fv: &FeatureVector) -> Vec<String> {
    let misalignment_note = fv
        .yaw_misalignment
        .map(|m| format!(" (currently {m:.1}° off the wind)"))
        .unwrap_or_default();

    match tier {
        ConfidenceTier::High => vec![
            format!("Schedule yaw bearing inspection and lubrication{misalignment_note}"),
            "Verify wind vane and nacelle position encoder calibration".to_string(),
            "Review yaw motor duty cycle for hunting or stalling".to_string(),
        ],
        ConfidenceTier::Moderate | ConfidenceTier::Low => vec![
            format!("Monitor yaw tracking error over the coming week{misalignment_note}"),
            "Check wind vane calibration at next site visit".to_string(),
        ],
    }
}

fn power_regulation_recommendations(tier: ConfidenceTier, fv: &FeatureVector) -> Vec<String> {
    let output_note = fv
        .load_factor
        .map(|lf| format!(" (output at {:.0}% of interval maximum)", lf * 100.0))
        .unwrap_or_default();

    match tier {
        ConfidenceTier::High => vec![
            format!("Confirm curtailment or grid setpoint is intentional{output_note}"),
            "Compare output against the reference power curve for this wind speed".to_string(),
            "Inspect pitch system response if no curtailment order is active".to_string(),
        ],
        ConfidenceTier::Moderate | ConfidenceTier::Low => vec![
            format!("Review controller setpoints and recent grid instructions{output_note}"),
            "Trend the power curve over the next operating day".to_string(),
        ],
    }
}

fn unknown_recommendations(fv: &FeatureVector, config: &TurbineConfig) -> Vec<String> {
    let mut recs = vec![format!(
        "Collect at least {} consecutive samples and re-run the analysis",
        config.window.window_samples
    )];
    if fv.window_len < 2 {
        recs.push("Trend features need a multi-sample batch; a single reading cannot resolve sustained conditions".to_string());
    }
    recs.push("Verify sensor feeds for the mandatory channels (wind speed, power, gearbox temperatures)".to_string());
    recs
}

// ============================================================================
// Tests
// ============================================================================
