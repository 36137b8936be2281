//! Analysis Session
//!
//! Orchestrates one request end to end: validate → extract → classify →
//! recommend. Sessions are stateless across requests — each invocation is
//! independent and reproducible given identical input — and share only the
//! read-only configuration.
//!
//! Batches produce the full trajectory (one result per record, each
//! classified against its trailing window); the last element is the most
//! recent state. Records are classified in parallel across the batch as a
//! pure performance optimization — every stage is a deterministic pure
//! function, so the output is identical to the sequential order.

use crate::classifier::ScenarioClassifier;
use crate::config::TurbineConfig;
use crate::features::FeatureExtractor;
use crate::ingest::{parse_csv_batch, parse_manual_record, ValidationError};
use crate::recommend::RecommendationEngine;
use crate::types::{ConfidenceTier, Scenario, ScenarioResult, SensorRecord};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors surfaced by a session request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("analysis cancelled before completion")]
    Cancelled,
}

/// One stateless analysis pipeline bound to a shared configuration.
pub struct AnalysisSession {
    config: Arc<TurbineConfig>,
}

impl AnalysisSession {
    pub fn new(config: Arc<TurbineConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TurbineConfig {
        &self.config
    }

    /// Analyze a raw CSV batch upload.
    ///
    /// Returns one `ScenarioResult` per record in batch order, or the
    /// validation error covering every rejected row. No classification work
    /// starts on a rejected batch.
    pub fn submit_batch(&self, raw_csv: &[u8]) -> Result<Vec<ScenarioResult>, AnalysisError> {
        self.submit_batch_with_cancel(raw_csv, &CancellationToken::new())
    }

    /// Analyze a raw CSV batch with cooperative cancellation.
    ///
    /// The token is checked between per-record steps; on cancellation the
    /// partial results are discarded and `AnalysisError::Cancelled` is
    /// returned — there is no partial commit to roll back.
    pub fn submit_batch_with_cancel(
        &self,
        raw_csv: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Vec<ScenarioResult>, AnalysisError> {
        let report = parse_csv_batch(raw_csv, &self.config)?;
        let results = self
            .classify_records(&report.records, cancel)
            .ok_or(AnalysisError::Cancelled)?;

        tracing::info!(
            records = results.len(),
            range_flags = report.range_warnings.len(),
            latest = %results.last().map(|r| r.scenario.to_string()).unwrap_or_default(),
            "Batch analysis complete"
        );
        Ok(results)
    }

    /// Analyze a single manual-entry record (a batch of one).
    ///
    /// A missing `time_stamp` field is stamped with the current UTC time;
    /// everything else in the pipeline is deterministic.
    pub fn submit_manual_record(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<ScenarioResult, ValidationError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let report = parse_manual_record(fields, now, &self.config)?;

        let Some(results) = self.classify_records(&report.records, &CancellationToken::new())
        else {
            // Unreachable with a fresh token
            return Err(ValidationError::EmptyBatch);
        };
        results.into_iter().next().ok_or(ValidationError::EmptyBatch)
    }

    /// Classify every record against its trailing window.
    /// Returns `None` when the token was cancelled mid-batch.
    fn classify_records(
        &self,
        records: &[SensorRecord],
        cancel: &CancellationToken,
    ) -> Option<Vec<ScenarioResult>> {
        let extractor = FeatureExtractor::new(&self.config);
        let classifier = ScenarioClassifier::new(&self.config);
        let recommender = RecommendationEngine::new(&self.config);

        let results: Option<Vec<ScenarioResult>> = (0..records.len())
            .into_par_iter()
            .map(|idx| {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(classify_one(
                    &self.config,
                    &extractor,
                    &classifier,
                    &recommender,
                    records,
                    idx,
                ))
            })
            .collect();

        if cancel.is_cancelled() {
            return None;
        }
        results
    }
}

/// Run one record (with its trailing window) through the pipeline.
fn classify_one(
    config: &TurbineConfig,
    extractor: &FeatureExtractor<'_>,
    classifier: &ScenarioClassifier<'_>,
    recommender: &RecommendationEngine<'_>,
    records: &[SensorRecord],
    idx: usize,
) -> ScenarioResult {
    let window_samples = config.window.window_samples;
    let start = (idx + 1).saturating_sub(window_samples);
    let window = &records[start..=idx];
    let record = &records[idx];

    let fv = extractor.extract(window);
    let mut classification = classifier.classify(&fv);

    // Mandatory-channel gate: without the core channels no verdict is
    // trustworthy, whatever the remaining features suggest.
    let missing = record.missing_mandatory();
    if !missing.is_empty() {
        tracing::debug!(
            timestamp = record.time_stamp,
            missing = ?missing,
            "Mandatory channels missing — resolving to Unknown"
        );
        classification.scenario = Scenario::Unknown;
        classification.confidence = 0.0;
        classification.contributing_features = Vec::new();
        classification.tier = ConfidenceTier::Low;
    }

    let recommendations = recommender.recommend(
        classification.scenario,
        classification.tier,
        &classification.contributing_features,
        &fv,
    );

    ScenarioResult {
        scenario: classification.scenario,
        confidence: classification.confidence,
        contributing_features: classification.contributing_features,
        recommendations,
        timestamp: DateTime::<Utc>::from_timestamp(record.time_stamp as i64, 0)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}

// ============================================================================
// Tests
// ============================================================================
