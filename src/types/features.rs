//! Derived feature vector types
//!
//! A `FeatureVector` is the classifier's sole input: per-sample features
//! derived from one record, plus rolling-window features that only exist
//! once the trailing window holds at least two usable samples. Missing
//! channels propagate as missing features rather than defaulting to zero,
//! so sensor dropouts cannot masquerade as nominal readings.

use serde::{Deserialize, Serialize};

/// Feature names, in declaration order.
///
/// Declaration order is the deterministic tie-breaker when ranking
/// contributing features, so the order of these constants (and of
/// [`ALL_FEATURES`]) is part of the output contract.
pub mod feature_names {
    pub const LOAD_FACTOR: &str = "load_factor";
    pub const PITCH_POWER_RATIO: &str = "pitch_power_ratio";
    pub const PHASE_TEMP_SPREAD: &str = "phase_temp_spread";
    pub const GEARBOX_TEMP_DELTA: &str = "gearbox_temp_delta";
    pub const YAW_MISALIGNMENT: &str = "yaw_misalignment";
    pub const WIND_SPEED_MEAN: &str = "wind_speed_mean";
    pub const WIND_SPEED_SD: &str = "wind_speed_sd";
    pub const GEAR_BEAR_TEMP_TREND: &str = "gear_bear_temp_trend";
    pub const YAW_MISALIGNMENT_TREND: &str = "yaw_misalignment_trend";
}

/// All feature names in declaration order.
pub const ALL_FEATURES: [&str; 9] = [
    feature_names::LOAD_FACTOR,
    feature_names::PITCH_POWER_RATIO,
    feature_names::PHASE_TEMP_SPREAD,
    feature_names::GEARBOX_TEMP_DELTA,
    feature_names::YAW_MISALIGNMENT,
    feature_names::WIND_SPEED_MEAN,
    feature_names::WIND_SPEED_SD,
    feature_names::GEAR_BEAR_TEMP_TREND,
    feature_names::YAW_MISALIGNMENT_TREND,
];

/// Derived numeric representation of one record and its trailing window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    // === Per-sample features ===
    /// Power / MaxPower (dimensionless, ~1.0 at full output)
    pub load_factor: Option<f64>,
    /// Pitch angle over load factor (deg) — high when the turbine pitches
    /// out of the wind while producing well below interval maximum
    pub pitch_power_ratio: Option<f64>,
    /// Max − min generator phase winding temperature (°C)
    pub phase_temp_spread: Option<f64>,
    /// Gearbox bearing − oil sump temperature (°C)
    pub gearbox_temp_delta: Option<f64>,
    /// |WindDirAbs − WindDirRel| folded to [0, 180] (deg)
    pub yaw_misalignment: Option<f64>,

    // === Windowed features (need ≥ 2 usable samples) ===
    /// Rolling mean wind speed over the window (m/s)
    pub wind_speed_mean: Option<f64>,
    /// Rolling sample standard deviation of wind speed (m/s)
    pub wind_speed_sd: Option<f64>,
    /// Least-squares slope of gearbox bearing temperature (°C per sample)
    pub gear_bear_temp_trend: Option<f64>,
    /// Least-squares slope of yaw misalignment magnitude (deg per sample)
    pub yaw_misalignment_trend: Option<f64>,

    /// Instantaneous wind speed (m/s), carried for profile gating
    /// (cut-in checks). Not a ranked feature.
    pub wind_speed: Option<f64>,

    /// Number of records in the trailing window (including the current one)
    pub window_len: usize,
}

impl FeatureVector {
    /// Look up a feature by name. Unknown names return `None`, the same as
    /// a missing feature, so profile tables cannot panic on a typo.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            feature_names::LOAD_FACTOR => self.load_factor,
            feature_names::PITCH_POWER_RATIO => self.pitch_power_ratio,
            feature_names::PHASE_TEMP_SPREAD => self.phase_temp_spread,
            feature_names::GEARBOX_TEMP_DELTA => self.gearbox_temp_delta,
            feature_names::YAW_MISALIGNMENT => self.yaw_misalignment,
            feature_names::WIND_SPEED_MEAN => self.wind_speed_mean,
            feature_names::WIND_SPEED_SD => self.wind_speed_sd,
            feature_names::GEAR_BEAR_TEMP_TREND => self.gear_bear_temp_trend,
            feature_names::YAW_MISALIGNMENT_TREND => self.yaw_misalignment_trend,
            _ => None,
        }
    }

    /// Whether the windowed trend features were computable for this sample.
    pub fn has_window(&self) -> bool {
        self.window_len >= 2
    }

    /// Position of a feature in declaration order (usize::MAX if unknown).
    /// Used for stable tie-breaking when ranking contributions.
    pub fn declaration_index(name: &str) -> usize {
        ALL_FEATURES
            .iter()
            .position(|&f| f == name)
            .unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_matches_fields() {
        let fv = FeatureVector {
            load_factor: Some(0.92),
            gearbox_temp_delta: Some(12.0),
            ..Default::default()
        };
        assert_eq!(fv.get(feature_names::LOAD_FACTOR), Some(0.92));
        assert_eq!(fv.get(feature_names::GEARBOX_TEMP_DELTA), Some(12.0));
        assert_eq!(fv.get(feature_names::WIND_SPEED_MEAN), None);
        assert_eq!(fv.get("no_such_feature"), None);
    }

    #[test]
    fn test_declaration_order_is_stable() {
        assert_eq!(FeatureVector::declaration_index(feature_names::LOAD_FACTOR), 0);
        assert!(
            FeatureVector::declaration_index(feature_names::GEARBOX_TEMP_DELTA)
                < FeatureVector::declaration_index(feature_names::GEAR_BEAR_TEMP_TREND)
        );
        assert_eq!(FeatureVector::declaration_index("bogus"), usize::MAX);
    }
}
