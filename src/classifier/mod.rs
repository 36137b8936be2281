//! Scenario Classifier
//!
//! Maps a `FeatureVector` to one of the fixed operating-state labels with a
//! normalized confidence and a ranked list of contributing features.
//!
//! The baseline engine is a threshold-and-rank protocol over per-scenario
//! reference profiles (`profiles`). The `ScenarioClassifier::classify`
//! interface is the stable seam: a trained statistical model can replace the
//! engine without touching ingestion, feature extraction, or the UI contract.

mod engine;
mod profiles;

pub use engine::*;
pub use profiles::*;
