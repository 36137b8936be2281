//! Batch Pipeline Integration Tests
//!
//! Exercises the full pipeline through `AnalysisSession::submit_batch` with
//! inline CSV fixtures. Asserts determinism over identical bytes, fail-fast
//! validation with complete row reporting, confidence bounds, and the
//! non-empty-recommendations invariant for every non-Normal result.

use driftops_core::ingest::ValidationError;
use driftops_core::types::channels;
use driftops_core::{AnalysisError, AnalysisSession, Scenario, TurbineConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

// ============================================================================
// CSV fixture helpers
// ============================================================================

fn nominal_value(channel: &str) -> &'static str {
    match channel {
        channels::WIND_SPEED => "8.2",
        channels::STD_DEV_WIND_SPEED => "0.9",
        channels::WIND_DIR_ABS => "182.0",
        channels::WIND_DIR_REL => "181.5",
        channels::POWER => "1700.0",
        channels::MAX_POWER => "2000.0",
        channels::MIN_POWER => "1500.0",
        channels::STD_DEV_POWER => "60.0",
        channels::AVG_R_POW => "120.0",
        channels::PITCH => "1.5",
        channels::GEN_RPM => "1510.0",
        channels::ROTOR_RPM => "15.2",
        channels::ENVIR_TEMP => "12.0",
        channels::NACEL_TEMP => "28.0",
        channels::GEAR_OIL_TEMP => "58.0",
        channels::GEAR_BEAR_TEMP => "64.0",
        channels::GEN_TEMP => "70.0",
        channels::GEN_PH1_TEMP => "72.0",
        channels::GEN_PH2_TEMP => "71.5",
        channels::GEN_PH3_TEMP => "72.5",
        channels::GEN_BEAR_TEMP => "55.0",
        _ => "",
    }
}

/// One CSV data row: nominal values with per-channel overrides.
fn row(ts: u64, overrides: &[(&str, &str)]) -> String {
    channels::ALL
        .iter()
        .map(|&c| {
            if c == channels::TIME_STAMP {
                ts.to_string()
            } else {
                overrides
                    .iter()
                    .find(|(k, _)| *k == c)
                    .map_or_else(|| nominal_value(c).to_string(), |(_, v)| (*v).to_string())
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn csv(rows: &[String]) -> Vec<u8> {
    let mut out = channels::ALL.join(",");
    out.push('\n');
    for r in rows {
        out.push_str(r);
        out.push('\n');
    }
    out.into_bytes()
}

fn session() -> AnalysisSession {
    AnalysisSession::new(Arc::new(TurbineConfig::default()))
}

// ============================================================================
// Tests
// ============================================================================

/// Nominal batch: every record classifies Normal with full confidence,
/// including the first record (no window needed to confirm nominal).
#[test]
fn nominal_batch_classifies_normal() {
    let rows: Vec<String> = (0..8).map(|i| row(1000 + i * 600, &[])).collect();
    let results = session().submit_batch(&csv(&rows)).expect("valid batch");

    assert_eq!(results.len(), 8);
    for result in &results {
        assert_eq!(result.scenario, Scenario::NormalOperation);
        assert!(result.confidence >= 0.5, "confidence: {}", result.confidence);
    }
}

/// Byte-identical input yields byte-identical serialized output.
#[test]
fn submit_batch_is_deterministic() {
    let rows: Vec<String> = (0..12)
        .map(|i| {
            row(
                1000 + i * 600,
                &[
                    (channels::GEAR_BEAR_TEMP, "79.0"),
                    (channels::POWER, "900.0"),
                ],
            )
        })
        .collect();
    let bytes = csv(&rows);

    let first = session().submit_batch(&bytes).expect("valid batch");
    let second = session().submit_batch(&bytes).expect("valid batch");

    let a = serde_json::to_string(&first).expect("serialize");
    let b = serde_json::to_string(&second).expect("serialize");
    assert_eq!(a, b, "identical bytes must yield identical results");
}

/// Sustained gearbox thermal signature resolves to Early Gearbox Bearing
/// Wear with a maintenance recommendation.
#[test]
fn gearbox_wear_batch_end_to_end() {
    let rows: Vec<String> = (0..6)
        .map(|i| {
            let bear = format!("{:.1}", 88.0 + i as f64 * 1.5);
            row(
                1000 + i * 600,
                &[
                    (channels::GEAR_BEAR_TEMP, bear.as_str()),
                    (channels::GEAR_OIL_TEMP, "60.0"),
                ],
            )
        })
        .collect();

    let results = session().submit_batch(&csv(&rows)).expect("valid batch");
    let last = results.last().expect("non-empty");

    assert_eq!(last.scenario, Scenario::GearboxBearingWear);
    assert!(last.confidence >= 0.6, "confidence: {}", last.confidence);
    assert!(
        last.recommendations
            .iter()
            .any(|r| r.to_lowercase().contains("maintenance")),
        "recommendations: {:?}",
        last.recommendations
    );
    assert!(
        last.contributing_features
            .contains(&"gearbox_temp_delta".to_string()),
        "contributing: {:?}",
        last.contributing_features
    );
}

/// A CSV missing the WindSpeed column is rejected naming that field, and
/// zero results are produced.
#[test]
fn missing_wind_speed_column_rejected() {
    let cols: Vec<&str> = channels::ALL
        .iter()
        .copied()
        .filter(|&c| c != channels::WIND_SPEED)
        .collect();
    let mut bytes = cols.join(",").into_bytes();
    bytes.extend_from_slice(b"\n1000,0.9,182.0,181.5,1700,2000,1500,60,120,1.5,1510,15.2,12,28,58,64,70,72,71.5,72.5,55\n");

    let err = session().submit_batch(&bytes).unwrap_err();
    match err {
        AnalysisError::Validation(ValidationError::MissingColumns(missing)) => {
            assert_eq!(missing, vec![channels::WIND_SPEED.to_string()]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

/// Every offending row is reported in one pass; nothing is classified.
#[test]
fn bad_rows_all_reported_no_partial_analysis() {
    let rows = vec![
        row(1000, &[]),
        row(1000, &[]),                                // duplicate timestamp
        row(1600, &[(channels::PITCH, "steep")]),      // garbage cell
        row(2200, &[]),
    ];
    let err = session().submit_batch(&csv(&rows)).unwrap_err();
    match err {
        AnalysisError::Validation(ValidationError::Rejected(errors)) => {
            assert_eq!(errors.len(), 2, "errors: {errors:?}");
            assert!(errors.iter().any(|e| e.row == 2 && e.field == channels::TIME_STAMP));
            assert!(errors.iter().any(|e| e.row == 3 && e.field == channels::PITCH));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

/// A single-record batch can never resolve a windowed-feature-dependent
/// scenario: a yaw misalignment snapshot resolves Unknown, not Degradation.
#[test]
fn single_record_yaw_spike_resolves_unknown() {
    let rows = vec![row(
        1000,
        &[
            (channels::WIND_DIR_ABS, "210.0"),
            (channels::WIND_DIR_REL, "182.0"),
        ],
    )];
    let results = session().submit_batch(&csv(&rows)).expect("valid batch");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].scenario, Scenario::Unknown);
    assert!(!results[0].recommendations.is_empty());
}

/// The same yaw signature sustained over a window resolves to degradation.
#[test]
fn sustained_yaw_misalignment_resolves_degradation() {
    let rows: Vec<String> = (0..8)
        .map(|i| {
            let rel = format!("{:.1}", 182.0 - i as f64 * 2.5);
            row(
                1000 + i * 600,
                &[
                    (channels::WIND_DIR_ABS, "210.0"),
                    (channels::WIND_DIR_REL, rel.as_str()),
                ],
            )
        })
        .collect();

    let results = session().submit_batch(&csv(&rows)).expect("valid batch");
    let last = results.last().expect("non-empty");
    assert_eq!(last.scenario, Scenario::YawBearingDegradation);
    assert!(!last.recommendations.is_empty());
}

/// Confidence stays within [0, 1] and non-Normal results always carry at
/// least one recommendation, across a batch mixing all signatures.
#[test]
fn mixed_batch_invariants_hold() {
    let mut rows: Vec<String> = Vec::new();
    let mut ts = 1000u64;
    for _ in 0..4 {
        rows.push(row(ts, &[]));
        ts += 600;
    }
    for _ in 0..4 {
        rows.push(row(
            ts,
            &[(channels::GEAR_BEAR_TEMP, "92.0"), (channels::GEAR_OIL_TEMP, "60.0")],
        ));
        ts += 600;
    }
    for _ in 0..4 {
        rows.push(row(
            ts,
            &[(channels::POWER, "400.0"), (channels::PITCH, "14.0")],
        ));
        ts += 600;
    }

    let results = session().submit_batch(&csv(&rows)).expect("valid batch");
    assert_eq!(results.len(), 12);
    for result in &results {
        assert!(
            (0.0..=1.0).contains(&result.confidence),
            "confidence out of bounds: {}",
            result.confidence
        );
        if result.scenario != Scenario::NormalOperation {
            assert!(
                !result.recommendations.is_empty(),
                "non-Normal result without recommendations: {result:?}"
            );
        }
    }
}

/// Missing cells propagate as missing; a batch with gaps in non-mandatory
/// channels still classifies.
#[test]
fn gaps_in_optional_channels_still_classify() {
    let rows: Vec<String> = (0..4)
        .map(|i| {
            row(
                1000 + i * 600,
                &[
                    (channels::GEN_PH1_TEMP, ""),
                    (channels::GEN_PH2_TEMP, "nan"),
                    (channels::AVG_R_POW, "-"),
                ],
            )
        })
        .collect();

    let results = session().submit_batch(&csv(&rows)).expect("valid batch");
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].scenario, Scenario::NormalOperation);
}

/// A pre-cancelled token aborts the batch with no partial results.
#[test]
fn cancellation_discards_partial_results() {
    let rows: Vec<String> = (0..50).map(|i| row(1000 + i * 600, &[])).collect();
    let token = CancellationToken::new();
    token.cancel();

    let err = session()
        .submit_batch_with_cancel(&csv(&rows), &token)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Cancelled), "got {err:?}");
}

/// Validation failures take precedence over cancellation: a rejected batch
/// reports its rows even with a cancelled token.
#[test]
fn validation_reported_before_cancellation() {
    let rows = vec![row(1000, &[(channels::WIND_SPEED, "gusty")])];
    let token = CancellationToken::new();
    token.cancel();

    let err = session()
        .submit_batch_with_cancel(&csv(&rows), &token)
        .unwrap_err();
    assert!(
        matches!(err, AnalysisError::Validation(ValidationError::Rejected(_))),
        "got {err:?}"
    );
}
