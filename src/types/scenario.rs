//! Scenario labels, confidence tiers, and the analysis result contract

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of turbine operating-state labels the classifier can emit.
///
/// Serialized names are the stable UI contract — the front-end matches on
/// these exact strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Scenario {
    /// All monitored subsystems within their reference envelope
    #[default]
    #[serde(rename = "Normal Operation")]
    NormalOperation,
    /// Output held below available wind resource (curtailment / derating)
    #[serde(rename = "Power Regulation")]
    PowerRegulation,
    /// Thermal signature of early-stage gearbox bearing wear
    #[serde(rename = "Early Gearbox Bearing Wear")]
    GearboxBearingWear,
    /// Sustained yaw tracking error indicating yaw bearing degradation
    #[serde(rename = "Yaw Bearing Degradation")]
    YawBearingDegradation,
    /// Confidence below threshold or mandatory data unavailable
    #[serde(rename = "Unknown")]
    Unknown,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::NormalOperation => write!(f, "Normal Operation"),
            Scenario::PowerRegulation => write!(f, "Power Regulation"),
            Scenario::GearboxBearingWear => write!(f, "Early Gearbox Bearing Wear"),
            Scenario::YawBearingDegradation => write!(f, "Yaw Bearing Degradation"),
            Scenario::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Scenario {
    pub fn is_normal(self) -> bool {
        matches!(self, Scenario::NormalOperation)
    }
}

/// Confidence tier used to pick the urgency of recommendation text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceTier {
    Low = 0,
    Moderate = 1,
    High = 2,
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceTier::Low => write!(f, "LOW"),
            ConfidenceTier::Moderate => write!(f, "MODERATE"),
            ConfidenceTier::High => write!(f, "HIGH"),
        }
    }
}

/// Final output of one analysis, one per classified record.
///
/// Serializes with camelCase field names and an RFC 3339 timestamp — the
/// shape the DriftOps front-end consumes verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    /// Winning scenario label
    pub scenario: Scenario,
    /// Normalized confidence in [0, 1]
    pub confidence: f64,
    /// Up to 3 feature names, ranked by weighted contribution to the
    /// winning scenario's score (descending)
    pub contributing_features: Vec<String>,
    /// 1-4 maintenance recommendations; always at least one for any
    /// non-Normal scenario
    pub recommendations: Vec<String>,
    /// Timestamp of the classified record (UTC)
    pub timestamp: DateTime<Utc>,
}
