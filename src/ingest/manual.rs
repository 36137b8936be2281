//! Manual-entry ingestion
//!
//! The front-end's manual tab submits a map of field name → raw string.
//! The map is validated against the closed 22-name enumeration at this
//! boundary — no open-ended key set travels deeper into the pipeline.
//! The parsed record is treated as a batch of one.

use super::{flag_range, parse_cell, parse_timestamp, IngestReport, RowError, ValidationError};
use crate::config::TurbineConfig;
use crate::types::{channels, SensorRecord};
use std::collections::HashMap;

/// Parse a manual field map into a single-record batch.
///
/// `fallback_timestamp` (Unix seconds) is used when `time_stamp` is absent
/// or blank — manual entries need not carry one. Keys outside the 22
/// recognized names are rejected, all of them reported at once.
pub fn parse_manual_record(
    fields: &HashMap<String, String>,
    fallback_timestamp: u64,
    config: &TurbineConfig,
) -> Result<IngestReport, ValidationError> {
    let mut unknown: Vec<String> = fields
        .keys()
        .filter(|k| !channels::ALL.contains(&k.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        return Err(ValidationError::UnknownFields(unknown));
    }

    let mut errors: Vec<RowError> = Vec::new();
    let mut range_warnings: Vec<String> = Vec::new();
    let mut record = SensorRecord::default();

    record.time_stamp = match fields.get(channels::TIME_STAMP).map(|s| s.trim()) {
        None | Some("") => fallback_timestamp,
        Some(raw) => match parse_timestamp(raw) {
            Ok(ts) => ts,
            Err(message) => {
                errors.push(RowError {
                    row: 1,
                    field: channels::TIME_STAMP.to_string(),
                    message,
                });
                fallback_timestamp
            }
        },
    };

    let limits = &config.thresholds.limits;
    for &channel in channels::ALL.iter().skip(1) {
        let Some(raw) = fields.get(channel) else {
            continue;
        };
        match parse_cell(raw) {
            Ok(value) => {
                if let Some(v) = value {
                    flag_range(1, channel, v, limits, &mut range_warnings);
                }
                record.set_channel(channel, value);
            }
            Err(message) => errors.push(RowError {
                row: 1,
                field: channel.to_string(),
                message,
            }),
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError::Rejected(errors));
    }

    Ok(IngestReport {
        records: vec![record],
        range_warnings,
    })
}
