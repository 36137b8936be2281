//! DriftOps Core: Wind Turbine Operating-State Classification
//!
//! Library core behind the DriftOps health-detection product. Ingests
//! time-stamped multi-sensor SCADA records (CSV batches or single manual
//! entries) and emits an operating-state scenario with a confidence value
//! and actionable maintenance recommendations.
//!
//! ## Architecture
//!
//! - **Ingestion & Validation**: CSV / manual field-map parsing with
//!   fail-fast, all-rows-reported diagnostics
//! - **Feature Extractor**: per-sample and rolling-window feature derivation
//! - **Scenario Classifier**: threshold-and-rank scoring against reference
//!   profiles (swappable for a statistical model)
//! - **Recommendation Engine**: scenario × confidence-tier advisory table
//! - **Analysis Session**: stateless orchestration of one request

pub mod classifier;
pub mod config;
pub mod features;
pub mod ingest;
pub mod recommend;
pub mod session;
pub mod types;

// Re-export turbine configuration
pub use config::TurbineConfig;

// Re-export commonly used types
pub use types::{
    channels, feature_names, ConfidenceTier, FeatureVector, Scenario, ScenarioResult,
    SensorRecord,
};

// Re-export pipeline components
pub use classifier::{Classification, ScenarioClassifier};
pub use features::FeatureExtractor;
pub use ingest::{IngestReport, RowError, ValidationError};
pub use recommend::RecommendationEngine;
pub use session::{AnalysisError, AnalysisSession};
