//! Turbine Configuration - All classifier thresholds as operator-tunable TOML values
//!
//! Every threshold, scale, and profile weight used by the scenario classifier
//! is a field in this module. Each struct implements `Default` with the
//! built-in calibration placeholders, ensuring identical behavior when no
//! config file is present. Numeric defaults are illustrative; a real
//! deployment calibrates them against labeled historical data.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one monitored turbine.
///
/// Load with `TurbineConfig::load()` which searches:
/// 1. `$DRIFTOPS_CONFIG` env var
/// 2. `./turbine_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurbineConfig {
    /// Turbine identification
    #[serde(default)]
    pub turbine: TurbineInfo,

    /// Rolling window sizing
    #[serde(default)]
    pub window: WindowConfig,

    /// All scenario detection thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Scenario profile weights
    #[serde(default)]
    pub profiles: ProfileWeightsConfig,

    /// Decision cutoffs (confidence tiers, contributing-feature cap)
    #[serde(default)]
    pub decision: DecisionConfig,
}

impl Default for TurbineConfig {
    fn default() -> Self {
        Self {
            turbine: TurbineInfo::default(),
            window: WindowConfig::default(),
            thresholds: ThresholdConfig::default(),
            profiles: ProfileWeightsConfig::default(),
            decision: DecisionConfig::default(),
        }
    }
}

impl TurbineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$DRIFTOPS_CONFIG` environment variable
    /// 2. `./turbine_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("DRIFTOPS_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), turbine = %config.turbine.name, "Loaded turbine config from DRIFTOPS_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from DRIFTOPS_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "DRIFTOPS_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("turbine_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(turbine = %config.turbine.name, "Loaded turbine config from ./turbine_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./turbine_config.toml, using defaults");
                }
            }
        }

        info!("No turbine_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Scales must be positive (they are divisors)
    /// - Profile weights must be non-negative, each scenario's sum positive
    /// - Confidence cutoffs must satisfy 0 < min < high <= 1
    /// - Window sizing must allow trend computation
    /// - Physical limits must have max > min
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let t = &self.thresholds;

        Self::check_positive(t.gearbox.temp_delta_scale_c, "thresholds.gearbox.temp_delta_scale_c", &mut errors);
        Self::check_positive(t.gearbox.bearing_trend_scale_c, "thresholds.gearbox.bearing_trend_scale_c", &mut errors);
        Self::check_positive(t.yaw.misalignment_scale_deg, "thresholds.yaw.misalignment_scale_deg", &mut errors);
        Self::check_positive(t.yaw.trend_scale_deg, "thresholds.yaw.trend_scale_deg", &mut errors);
        Self::check_positive(t.power.load_factor_scale, "thresholds.power.load_factor_scale", &mut errors);
        Self::check_positive(t.power.pitch_ratio_scale, "thresholds.power.pitch_ratio_scale", &mut errors);
        Self::check_positive(t.electrical.phase_spread_scale_c, "thresholds.electrical.phase_spread_scale_c", &mut errors);
        Self::check_positive(self.turbine.cut_in_wind_speed_ms, "turbine.cut_in_wind_speed_ms", &mut errors);

        if !(0.0..=1.0).contains(&t.power.nominal_load_factor) {
            errors.push(format!(
                "thresholds.power.nominal_load_factor ({:.2}) must be within [0, 1]",
                t.power.nominal_load_factor
            ));
        }

        // Profile weights
        let p = &self.profiles;
        for (name, w) in [
            ("profiles.gearbox.temp_delta_weight", p.gearbox.temp_delta_weight),
            ("profiles.gearbox.bearing_trend_weight", p.gearbox.bearing_trend_weight),
            ("profiles.gearbox.phase_spread_weight", p.gearbox.phase_spread_weight),
            ("profiles.yaw.misalignment_weight", p.yaw.misalignment_weight),
            ("profiles.yaw.trend_weight", p.yaw.trend_weight),
            ("profiles.power.load_factor_weight", p.power.load_factor_weight),
            ("profiles.power.pitch_ratio_weight", p.power.pitch_ratio_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                errors.push(format!("{name} ({w}) must be a finite non-negative number"));
            }
        }
        let gearbox_sum =
            p.gearbox.temp_delta_weight + p.gearbox.bearing_trend_weight + p.gearbox.phase_spread_weight;
        if gearbox_sum <= 0.0 {
            errors.push("profiles.gearbox weights must not all be zero".to_string());
        }
        if p.yaw.misalignment_weight + p.yaw.trend_weight <= 0.0 {
            errors.push("profiles.yaw weights must not all be zero".to_string());
        }
        if p.power.load_factor_weight + p.power.pitch_ratio_weight <= 0.0 {
            errors.push("profiles.power weights must not all be zero".to_string());
        }

        // Decision cutoffs
        let d = &self.decision;
        if !(d.min_confidence > 0.0 && d.min_confidence < 1.0) {
            errors.push(format!(
                "decision.min_confidence ({:.2}) must be within (0, 1)",
                d.min_confidence
            ));
        }
        if d.high_confidence <= d.min_confidence || d.high_confidence > 1.0 {
            errors.push(format!(
                "decision.high_confidence ({:.2}) must be within (min_confidence, 1]",
                d.high_confidence
            ));
        }
        if d.max_contributing_features == 0 {
            errors.push("decision.max_contributing_features must be > 0".to_string());
        }

        // Window sizing
        let w = &self.window;
        if w.window_samples < 2 {
            errors.push(format!(
                "window.window_samples ({}) must be >= 2",
                w.window_samples
            ));
        }
        if w.min_trend_samples < 2 {
            errors.push(format!(
                "window.min_trend_samples ({}) must be >= 2",
                w.min_trend_samples
            ));
        }
        if w.min_trend_samples > w.window_samples {
            errors.push(format!(
                "window.min_trend_samples ({}) must be <= window_samples ({})",
                w.min_trend_samples, w.window_samples
            ));
        }

        // Physical limits: max > min
        let l = &t.limits;
        Self::check_range(l.pitch_deg_min, l.pitch_deg_max, "thresholds.limits.pitch_deg", &mut errors);
        Self::check_range(l.temp_min_c, l.temp_max_c, "thresholds.limits.temp_c", &mut errors);
        Self::check_positive(l.gen_rpm_max, "thresholds.limits.gen_rpm_max", &mut errors);
        Self::check_positive(l.rotor_rpm_max, "thresholds.limits.rotor_rpm_max", &mut errors);
        Self::check_positive(l.wind_speed_max_ms, "thresholds.limits.wind_speed_max_ms", &mut errors);

        // Reject NaN/Inf anywhere (sweep all f64 fields via serialization)
        if let Ok(ref s) = toml::to_string(self) {
            if s.contains("nan") || s.contains("inf") {
                errors.push(
                    "Config contains NaN or Inf values — all thresholds must be finite numbers"
                        .to_string(),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{name} ({value}) must be a finite positive number"));
        }
    }

    fn check_range(min: f64, max: f64, name: &str, errors: &mut Vec<String>) {
        if !min.is_finite() || !max.is_finite() {
            errors.push(format!(
                "{name}: bounds must be finite (got min={min}, max={max})"
            ));
            return;
        }
        if max <= min {
            errors.push(format!("{name}: max ({max:.1}) must be > min ({min:.1})"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Turbine Info
// ============================================================================

/// Identification and platform metadata — appears in logs and reports;
/// `cut_in_wind_speed_ms` also gates the power-regulation profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurbineInfo {
    /// Turbine name / asset identifier
    #[serde(default = "default_turbine_name")]
    pub name: String,

    /// Wind farm / site name
    #[serde(default)]
    pub site: String,

    /// Nameplate rated power (kW)
    #[serde(default = "default_rated_power")]
    pub rated_power_kw: f64,

    /// Cut-in wind speed (m/s). Below this the turbine is not expected to
    /// produce, so low load factor is not evidence of power regulation.
    #[serde(default = "default_cut_in")]
    pub cut_in_wind_speed_ms: f64,
}

fn default_turbine_name() -> String {
    "DEFAULT".to_string()
}
fn default_rated_power() -> f64 {
    2000.0
}
fn default_cut_in() -> f64 {
    3.5
}

impl Default for TurbineInfo {
    fn default() -> Self {
        Self {
            name: default_turbine_name(),
            site: String::new(),
            rated_power_kw: default_rated_power(),
            cut_in_wind_speed_ms: default_cut_in(),
        }
    }
}

// ============================================================================
// Window Config
// ============================================================================

/// Rolling window sizing for trend features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Maximum trailing records per window (including the current one).
    /// Sized so a window spans a few minutes at the native sampling rate.
    #[serde(default = "default_window_samples")]
    pub window_samples: usize,

    /// Minimum finite samples required before rolling/trend features are
    /// computed. Below this they are marked unavailable, never zero.
    #[serde(default = "default_min_trend_samples")]
    pub min_trend_samples: usize,
}

fn default_window_samples() -> usize {
    12
}
fn default_min_trend_samples() -> usize {
    2
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_samples: default_window_samples(),
            min_trend_samples: default_min_trend_samples(),
        }
    }
}

// ============================================================================
// Threshold Config (master container)
// ============================================================================

/// All detection thresholds, grouped by subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default)]
    pub gearbox: GearboxThresholds,

    #[serde(default)]
    pub yaw: YawThresholds,

    #[serde(default)]
    pub power: PowerThresholds,

    #[serde(default)]
    pub electrical: ElectricalThresholds,

    #[serde(default)]
    pub limits: PhysicalLimits,
}

// ============================================================================
// Gearbox Thresholds
// ============================================================================

/// Gearbox bearing wear detection thresholds.
///
/// A bearing running hot relative to the oil sump is the earliest thermal
/// signature of wear; the rolling temperature trend confirms it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearboxThresholds {
    /// Bearing − oil delta above which wear evidence accrues (°C).
    #[serde(default = "default_gearbox_delta_warning")]
    pub temp_delta_warning_c: f64,

    /// Delta normalization scale (°C per unit of evidence).
    #[serde(default = "default_gearbox_delta_scale")]
    pub temp_delta_scale_c: f64,

    /// Bearing temperature rise rate above which wear evidence accrues
    /// (°C per sample).
    #[serde(default = "default_bearing_trend_warning")]
    pub bearing_trend_warning_c: f64,

    /// Trend normalization scale (°C per sample per unit of evidence).
    #[serde(default = "default_bearing_trend_scale")]
    pub bearing_trend_scale_c: f64,
}

fn default_gearbox_delta_warning() -> f64 {
    20.0
}
fn default_gearbox_delta_scale() -> f64 {
    20.0
}
fn default_bearing_trend_warning() -> f64 {
    0.2
}
fn default_bearing_trend_scale() -> f64 {
    0.5
}

impl Default for GearboxThresholds {
    fn default() -> Self {
        Self {
            temp_delta_warning_c: default_gearbox_delta_warning(),
            temp_delta_scale_c: default_gearbox_delta_scale(),
            bearing_trend_warning_c: default_bearing_trend_warning(),
            bearing_trend_scale_c: default_bearing_trend_scale(),
        }
    }
}

// ============================================================================
// Yaw Thresholds
// ============================================================================

/// Yaw bearing degradation detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YawThresholds {
    /// Misalignment magnitude above which degradation evidence accrues (deg).
    #[serde(default = "default_yaw_misalignment_warning")]
    pub misalignment_warning_deg: f64,

    /// Misalignment normalization scale (deg).
    #[serde(default = "default_yaw_misalignment_scale")]
    pub misalignment_scale_deg: f64,

    /// Sustained misalignment growth rate above which degradation evidence
    /// accrues (deg per sample).
    #[serde(default = "default_yaw_trend_warning")]
    pub trend_warning_deg: f64,

    /// Trend normalization scale (deg per sample).
    #[serde(default = "default_yaw_trend_scale")]
    pub trend_scale_deg: f64,
}

fn default_yaw_misalignment_warning() -> f64 {
    10.0
}
fn default_yaw_misalignment_scale() -> f64 {
    15.0
}
fn default_yaw_trend_warning() -> f64 {
    0.15
}
fn default_yaw_trend_scale() -> f64 {
    0.5
}

impl Default for YawThresholds {
    fn default() -> Self {
        Self {
            misalignment_warning_deg: default_yaw_misalignment_warning(),
            misalignment_scale_deg: default_yaw_misalignment_scale(),
            trend_warning_deg: default_yaw_trend_warning(),
            trend_scale_deg: default_yaw_trend_scale(),
        }
    }
}

// ============================================================================
// Power Thresholds
// ============================================================================

/// Power regulation (curtailment / derating) detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerThresholds {
    /// Load factor expected during unconstrained production.
    /// Evidence accrues as the observed load factor falls below this.
    #[serde(default = "default_nominal_load_factor")]
    pub nominal_load_factor: f64,

    /// Load factor deficit normalization scale.
    #[serde(default = "default_load_factor_scale")]
    pub load_factor_scale: f64,

    /// Pitch-to-load-factor ratio above which regulation evidence accrues
    /// (deg). High pitch at low output means the controller is shedding wind.
    #[serde(default = "default_pitch_ratio_warning")]
    pub pitch_ratio_warning: f64,

    /// Pitch ratio normalization scale (deg).
    #[serde(default = "default_pitch_ratio_scale")]
    pub pitch_ratio_scale: f64,
}

fn default_nominal_load_factor() -> f64 {
    0.85
}
fn default_load_factor_scale() -> f64 {
    0.5
}
fn default_pitch_ratio_warning() -> f64 {
    5.0
}
fn default_pitch_ratio_scale() -> f64 {
    10.0
}

impl Default for PowerThresholds {
    fn default() -> Self {
        Self {
            nominal_load_factor: default_nominal_load_factor(),
            load_factor_scale: default_load_factor_scale(),
            pitch_ratio_warning: default_pitch_ratio_warning(),
            pitch_ratio_scale: default_pitch_ratio_scale(),
        }
    }
}

// ============================================================================
// Electrical Thresholds
// ============================================================================

/// Generator electrical-side thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricalThresholds {
    /// Inter-phase winding temperature spread above which drivetrain wear
    /// evidence accrues (°C).
    #[serde(default = "default_phase_spread_warning")]
    pub phase_spread_warning_c: f64,

    /// Phase spread normalization scale (°C).
    #[serde(default = "default_phase_spread_scale")]
    pub phase_spread_scale_c: f64,
}

fn default_phase_spread_warning() -> f64 {
    8.0
}
fn default_phase_spread_scale() -> f64 {
    10.0
}

impl Default for ElectricalThresholds {
    fn default() -> Self {
        Self {
            phase_spread_warning_c: default_phase_spread_warning(),
            phase_spread_scale_c: default_phase_spread_scale(),
        }
    }
}

// ============================================================================
// Physical Limits
// ============================================================================

/// Plausibility ranges for physically bounded channels.
///
/// Violations are flagged as warnings during ingestion — values are never
/// clamped, so the classifier sees the data as reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalLimits {
    /// Minimum plausible pitch angle (deg).
    #[serde(default = "default_pitch_min")]
    pub pitch_deg_min: f64,

    /// Maximum plausible pitch angle (deg).
    #[serde(default = "default_pitch_max")]
    pub pitch_deg_max: f64,

    /// Maximum plausible generator speed (RPM).
    #[serde(default = "default_gen_rpm_max")]
    pub gen_rpm_max: f64,

    /// Maximum plausible rotor speed (RPM).
    #[serde(default = "default_rotor_rpm_max")]
    pub rotor_rpm_max: f64,

    /// Minimum plausible temperature for any temperature channel (°C).
    #[serde(default = "default_temp_min")]
    pub temp_min_c: f64,

    /// Maximum plausible temperature for any temperature channel (°C).
    #[serde(default = "default_temp_max")]
    pub temp_max_c: f64,

    /// Maximum plausible wind speed (m/s).
    #[serde(default = "default_wind_speed_max")]
    pub wind_speed_max_ms: f64,
}

fn default_pitch_min() -> f64 {
    -10.0
}
fn default_pitch_max() -> f64 {
    95.0
}
fn default_gen_rpm_max() -> f64 {
    2500.0
}
fn default_rotor_rpm_max() -> f64 {
    40.0
}
fn default_temp_min() -> f64 {
    -40.0
}
fn default_temp_max() -> f64 {
    150.0
}
fn default_wind_speed_max() -> f64 {
    60.0
}

impl Default for PhysicalLimits {
    fn default() -> Self {
        Self {
            pitch_deg_min: default_pitch_min(),
            pitch_deg_max: default_pitch_max(),
            gen_rpm_max: default_gen_rpm_max(),
            rotor_rpm_max: default_rotor_rpm_max(),
            temp_min_c: default_temp_min(),
            temp_max_c: default_temp_max(),
            wind_speed_max_ms: default_wind_speed_max(),
        }
    }
}

// ============================================================================
// Profile Weights
// ============================================================================

/// Per-scenario feature weights for the threshold-and-rank classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileWeightsConfig {
    #[serde(default)]
    pub gearbox: GearboxWeights,

    #[serde(default)]
    pub yaw: YawWeights,

    #[serde(default)]
    pub power: PowerWeights,
}

/// Early gearbox bearing wear profile weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearboxWeights {
    #[serde(default = "default_w_gearbox_delta")]
    pub temp_delta_weight: f64,

    #[serde(default = "default_w_bearing_trend")]
    pub bearing_trend_weight: f64,

    #[serde(default = "default_w_phase_spread")]
    pub phase_spread_weight: f64,
}

fn default_w_gearbox_delta() -> f64 {
    1.0
}
fn default_w_bearing_trend() -> f64 {
    0.8
}
fn default_w_phase_spread() -> f64 {
    0.4
}

impl Default for GearboxWeights {
    fn default() -> Self {
        Self {
            temp_delta_weight: default_w_gearbox_delta(),
            bearing_trend_weight: default_w_bearing_trend(),
            phase_spread_weight: default_w_phase_spread(),
        }
    }
}

/// Yaw bearing degradation profile weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YawWeights {
    #[serde(default = "default_w_yaw_misalignment")]
    pub misalignment_weight: f64,

    #[serde(default = "default_w_yaw_trend")]
    pub trend_weight: f64,
}

fn default_w_yaw_misalignment() -> f64 {
    0.6
}
fn default_w_yaw_trend() -> f64 {
    1.0
}

impl Default for YawWeights {
    fn default() -> Self {
        Self {
            misalignment_weight: default_w_yaw_misalignment(),
            trend_weight: default_w_yaw_trend(),
        }
    }
}

/// Power regulation profile weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerWeights {
    #[serde(default = "default_w_load_factor")]
    pub load_factor_weight: f64,

    #[serde(default = "default_w_pitch_ratio")]
    pub pitch_ratio_weight: f64,
}

fn default_w_load_factor() -> f64 {
    1.0
}
fn default_w_pitch_ratio() -> f64 {
    0.5
}

impl Default for PowerWeights {
    fn default() -> Self {
        Self {
            load_factor_weight: default_w_load_factor(),
            pitch_ratio_weight: default_w_pitch_ratio(),
        }
    }
}

// ============================================================================
// Decision Config
// ============================================================================

/// Decision cutoffs applied after score normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Below this normalized confidence the result is overridden to
    /// Unknown (insufficient evidence).
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// At or above this confidence, recommendations use the high-urgency
    /// tier.
    #[serde(default = "default_high_confidence")]
    pub high_confidence: f64,

    /// Maximum number of contributing features reported per result.
    #[serde(default = "default_max_contributing")]
    pub max_contributing_features: usize,
}

fn default_min_confidence() -> f64 {
    0.5
}
fn default_high_confidence() -> f64 {
    0.75
}
fn default_max_contributing() -> usize {
    3
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            high_confidence: default_high_confidence(),
            max_contributing_features: default_max_contributing(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
