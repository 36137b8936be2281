//! Ingestion & Validation
//!
//! Turns raw input — a CSV batch upload or a manual field map — into
//! validated `SensorRecord`s, or fails with a `ValidationError` that names
//! every offending row and field in one pass. No classification work starts
//! until the whole batch has passed validation.
//!
//! Parsing rules:
//! - Header/field names must match the 22 recognized channel names exactly
//!   (case-sensitive). Unknown columns are ignored with a warning; missing
//!   required columns fail validation.
//! - Empty cells and the sentinels `nan` / `null` / `-` become "missing"
//!   (not zero). Any other non-numeric text is a validation error.
//! - Timestamps must parse and be strictly increasing within a batch.

mod csv_batch;
mod manual;

pub use csv_batch::*;
pub use manual::*;

use crate::config::PhysicalLimits;
use crate::types::channels;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// One rejected row/field. `row` is the 1-based data-row index (the header
/// is row 0); manual records report row 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}, field '{}': {}", self.row, self.field, self.message)
    }
}

fn join_row_errors(errors: &[RowError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n  - ")
}

/// Recoverable, user-correctable input errors. Surfaced verbatim to the
/// caller; analysis does not proceed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("CSV header missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("input contains no data rows")]
    EmptyBatch,

    #[error("batch rejected — {} invalid row(s):\n  - {}", .0.len(), join_row_errors(.0))]
    Rejected(Vec<RowError>),

    #[error("unrecognized manual-entry fields: {}", .0.join(", "))]
    UnknownFields(Vec<String>),
}

// ============================================================================
// Ingest Report
// ============================================================================

/// Validated batch plus non-fatal findings.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Records in batch order, timestamps strictly increasing.
    pub records: Vec<crate::types::SensorRecord>,
    /// Physical-range flags: value kept as reported, violation noted.
    pub range_warnings: Vec<String>,
}

// ============================================================================
// CSV Splitting
// ============================================================================

/// Split a CSV line respecting quoted fields (commas inside quotes,
/// doubled-quote escapes). Returns owned strings because quoted fields
/// need unquoting.
pub(crate) fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

// ============================================================================
// Cell Parsing
// ============================================================================

/// Parse one numeric cell.
///
/// `Ok(None)` = missing (empty or a missing-value sentinel; non-finite
/// literals also count as missing). `Err` = garbage text the operator
/// should correct.
pub(crate) fn parse_cell(raw: &str) -> Result<Option<f64>, String> {
    let s = raw.trim().trim_matches('"').trim();
    if s.is_empty()
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
        || s == "-"
    {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(_) => Err(format!("not a number: '{s}'")),
    }
}

/// Parse a timestamp cell to Unix seconds.
///
/// Accepts integer/float epoch (seconds or milliseconds), RFC 3339, and the
/// common `YYYY-MM-DD HH:MM:SS` variants. Naive timestamps assume UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<u64, String> {
    let s = raw.trim().trim_matches('"').trim();

    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Err("empty timestamp".to_string());
    }

    // Unix epoch (numeric); values past year ~2286 are taken as milliseconds
    if let Ok(epoch) = s.parse::<u64>() {
        return Ok(if epoch > 10_000_000_000 { epoch / 1000 } else { epoch });
    }
    if let Ok(epoch_f) = s.parse::<f64>() {
        if epoch_f.is_finite() && epoch_f >= 0.0 {
            return Ok(epoch_f as u64);
        }
        return Err(format!("cannot parse timestamp: '{s}'"));
    }

    // RFC 3339 / ISO 8601 with timezone
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp().max(0) as u64);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.timestamp().max(0) as u64);
    }

    // Without timezone (assume UTC)
    for fmt in &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc().timestamp().max(0) as u64);
        }
    }

    Err(format!("cannot parse timestamp: '{s}'"))
}

// ============================================================================
// Physical Range Flags
// ============================================================================

/// Plausibility range for a channel, if it is physically bounded.
pub(crate) fn range_for(channel: &str, limits: &PhysicalLimits) -> Option<(f64, f64)> {
    match channel {
        channels::PITCH => Some((limits.pitch_deg_min, limits.pitch_deg_max)),
        channels::GEN_RPM => Some((0.0, limits.gen_rpm_max)),
        channels::ROTOR_RPM => Some((0.0, limits.rotor_rpm_max)),
        channels::WIND_SPEED | channels::STD_DEV_WIND_SPEED => {
            Some((0.0, limits.wind_speed_max_ms))
        }
        channels::ENVIR_TEMP
        | channels::NACEL_TEMP
        | channels::GEAR_OIL_TEMP
        | channels::GEAR_BEAR_TEMP
        | channels::GEN_TEMP
        | channels::GEN_PH1_TEMP
        | channels::GEN_PH2_TEMP
        | channels::GEN_PH3_TEMP
        | channels::GEN_BEAR_TEMP => Some((limits.temp_min_c, limits.temp_max_c)),
        _ => None,
    }
}

/// Flag (never clamp) a value outside its plausibility range.
pub(crate) fn flag_range(
    row: usize,
    channel: &str,
    value: f64,
    limits: &PhysicalLimits,
    warnings: &mut Vec<String>,
) {
    if let Some((min, max)) = range_for(channel, limits) {
        if value < min || value > max {
            let msg = format!(
                "row {row}: {channel} = {value} outside physical range [{min}, {max}]"
            );
            tracing::warn!(row, channel, value, "{}", msg);
            warnings.push(msg);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
