//! CSV batch ingestion
//!
//! Parses a raw SCADA CSV export (header + one sample per row) into
//! validated `SensorRecord`s. The whole batch fails fast on any invalid
//! row, but every offending row is reported in one pass — an operator
//! fixes the file once, not once per error.

use super::{
    csv_split, flag_range, parse_cell, parse_timestamp, IngestReport, RowError, ValidationError,
};
use crate::config::TurbineConfig;
use crate::types::{channels, SensorRecord};

// ============================================================================
// Column Mapping
// ============================================================================

/// Maps the 22 recognized channel names to header column indices.
#[derive(Debug, Clone)]
struct ColumnMap {
    /// Parallel to `channels::ALL`
    indices: [Option<usize>; channels::ALL.len()],
}

impl ColumnMap {
    /// Build from a header line. Returns the map and any unknown column
    /// names (ignored with a warning upstream). Matching is exact and
    /// case-sensitive; a duplicated column keeps its first occurrence.
    fn from_header(header: &str) -> (Self, Vec<String>) {
        let mut indices = [None; channels::ALL.len()];
        let mut unknown = Vec::new();

        for (idx, col) in csv_split(header).iter().enumerate() {
            let name = col.trim().trim_matches('"');
            if name.is_empty() {
                continue;
            }
            match channels::ALL.iter().position(|&c| c == name) {
                Some(pos) => {
                    if indices[pos].is_none() {
                        indices[pos] = Some(idx);
                    }
                }
                None => unknown.push(name.to_string()),
            }
        }

        (Self { indices }, unknown)
    }

    /// Required columns absent from the header, in canonical order.
    fn missing_columns(&self) -> Vec<String> {
        channels::ALL
            .iter()
            .zip(self.indices.iter())
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| (*name).to_string())
            .collect()
    }

    fn cell<'a>(&self, fields: &'a [String], channel_pos: usize) -> &'a str {
        self.indices[channel_pos]
            .and_then(|i| fields.get(i))
            .map_or("", String::as_str)
    }
}

// ============================================================================
// Batch Parsing
// ============================================================================

/// Parse a raw CSV batch into validated records.
///
/// Returns every record in batch order with strictly increasing timestamps,
/// or a `ValidationError` covering all problems found.
pub fn parse_csv_batch(
    raw: &[u8],
    config: &TurbineConfig,
) -> Result<IngestReport, ValidationError> {
    let text = String::from_utf8_lossy(raw);
    let mut lines = text.lines().map(str::trim_end);

    let header = loop {
        match lines.next() {
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => break line,
            None => return Err(ValidationError::EmptyBatch),
        }
    };

    let (col_map, unknown) = ColumnMap::from_header(header);
    for col in &unknown {
        tracing::warn!(column = %col, "Ignoring unrecognized CSV column");
    }

    let missing = col_map.missing_columns();
    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns(missing));
    }

    let limits = &config.thresholds.limits;
    let mut records: Vec<SensorRecord> = Vec::new();
    let mut errors: Vec<RowError> = Vec::new();
    let mut range_warnings: Vec<String> = Vec::new();
    let mut prev_ts: Option<u64> = None;
    let mut row = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        row += 1;

        let fields = csv_split(line);

        // Timestamp first: without it the row cannot anchor to the series.
        let ts_cell = col_map.cell(&fields, 0);
        let ts = match parse_timestamp(ts_cell) {
            Ok(ts) => match prev_ts {
                Some(prev) if ts == prev => {
                    errors.push(RowError {
                        row,
                        field: channels::TIME_STAMP.to_string(),
                        message: format!("duplicate timestamp {ts}"),
                    });
                    None
                }
                Some(prev) if ts < prev => {
                    errors.push(RowError {
                        row,
                        field: channels::TIME_STAMP.to_string(),
                        message: format!("non-monotonic timestamp: {ts} after {prev}"),
                    });
                    None
                }
                _ => {
                    prev_ts = Some(ts);
                    Some(ts)
                }
            },
            Err(message) => {
                errors.push(RowError {
                    row,
                    field: channels::TIME_STAMP.to_string(),
                    message,
                });
                None
            }
        };

        // Parse every numeric cell even when the timestamp failed, so one
        // pass reports all of the row's problems.
        let mut record = SensorRecord::default();
        for (pos, &channel) in channels::ALL.iter().enumerate().skip(1) {
            match parse_cell(col_map.cell(&fields, pos)) {
                Ok(value) => {
                    if let Some(v) = value {
                        flag_range(row, channel, v, limits, &mut range_warnings);
                    }
                    record.set_channel(channel, value);
                }
                Err(message) => errors.push(RowError {
                    row,
                    field: channel.to_string(),
                    message,
                }),
            }
        }

        if let Some(ts) = ts {
            record.time_stamp = ts;
            records.push(record);
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError::Rejected(errors));
    }
    if records.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    tracing::info!(
        rows = records.len(),
        range_flags = range_warnings.len(),
        time_range = ?(records[0].time_stamp, records[records.len() - 1].time_stamp),
        "CSV batch validated"
    );

    Ok(IngestReport {
        records,
        range_warnings,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        channels::ALL.join(",")
    }

    /// A data row with every channel at a nominal value.
    fn nominal_row(ts: u64) -> String {
        format!(
            "{ts},8.2,0.9,182.0,181.0,1700.0,2000.0,1500.0,60.0,120.0,1.5,1510.0,15.2,12.0,28.0,58.0,64.0,70.0,72.0,71.5,72.5,55.0"
        )
    }

    #[test]
    fn test_valid_batch_parses_in_order() {
        let csv = format!("{}\n{}\n{}\n", header(), nominal_row(1000), nominal_row(1600));
        let report = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).expect("valid");
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].time_stamp, 1000);
        assert_eq!(report.records[1].time_stamp, 1600);
        assert_eq!(report.records[0].wind_speed, Some(8.2));
        assert_eq!(report.records[0].gear_bear_temp, Some(64.0));
        assert!(report.range_warnings.is_empty());
    }

    #[test]
    fn test_header_order_independent() {
        // Reverse the canonical column order; values must still land on the
        // right channels.
        let mut cols: Vec<&str> = channels::ALL.to_vec();
        cols.reverse();
        let mut values: Vec<String> = nominal_row(1000).split(',').map(String::from).collect();
        values.reverse();
        let csv = format!("{}\n{}\n", cols.join(","), values.join(","));

        let report = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).expect("valid");
        assert_eq!(report.records[0].time_stamp, 1000);
        assert_eq!(report.records[0].wind_speed, Some(8.2));
        assert_eq!(report.records[0].gen_bear_temp, Some(55.0));
    }

    #[test]
    fn test_missing_column_rejected_by_name() {
        let cols: Vec<&str> = channels::ALL
            .iter()
            .copied()
            .filter(|&c| c != channels::WIND_SPEED)
            .collect();
        let csv = format!("{}\n", cols.join(","));
        let err = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).unwrap_err();
        match err {
            ValidationError::MissingColumns(missing) => {
                assert_eq!(missing, vec![channels::WIND_SPEED.to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_column_ignored() {
        let csv = format!(
            "{},Comment\n{},operator note\n",
            header(),
            nominal_row(1000)
        );
        let report = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).expect("valid");
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn test_empty_cells_become_missing() {
        // Blank out WindSpeed (2nd column) and GearBearTemp (17th column)
        let mut values: Vec<String> = nominal_row(1000).split(',').map(String::from).collect();
        values[1] = String::new();
        values[16] = "NaN".to_string();
        let csv = format!("{}\n{}\n", header(), values.join(","));

        let report = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).expect("valid");
        assert_eq!(report.records[0].wind_speed, None);
        assert_eq!(report.records[0].gear_bear_temp, None);
        assert_eq!(report.records[0].power, Some(1700.0));
    }

    #[test]
    fn test_garbage_cell_reports_row_and_field() {
        let mut values: Vec<String> = nominal_row(1000).split(',').map(String::from).collect();
        values[1] = "breezy".to_string();
        let csv = format!("{}\n{}\n", header(), values.join(","));

        let err = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).unwrap_err();
        match err {
            ValidationError::Rejected(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].row, 1);
                assert_eq!(errors[0].field, channels::WIND_SPEED);
                assert!(errors[0].message.contains("breezy"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_and_backwards_timestamps_rejected() {
        let csv = format!(
            "{}\n{}\n{}\n{}\n",
            header(),
            nominal_row(1000),
            nominal_row(1000),
            nominal_row(400),
        );
        let err = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).unwrap_err();
        match err {
            ValidationError::Rejected(errors) => {
                assert_eq!(errors.len(), 2, "both bad rows reported: {errors:?}");
                assert_eq!(errors[0].row, 2);
                assert!(errors[0].message.contains("duplicate"));
                assert_eq!(errors[1].row, 3);
                assert!(errors[1].message.contains("non-monotonic"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_all_errors_reported_in_one_pass() {
        // Row 1: garbage Pitch. Row 2: garbage timestamp. Row 3: fine.
        let mut row1: Vec<String> = nominal_row(1000).split(',').map(String::from).collect();
        row1[10] = "steep".to_string();
        let mut row2: Vec<String> = nominal_row(1600).split(',').map(String::from).collect();
        row2[0] = "noonish".to_string();
        let csv = format!(
            "{}\n{}\n{}\n{}\n",
            header(),
            row1.join(","),
            row2.join(","),
            nominal_row(2200),
        );

        let err = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).unwrap_err();
        match err {
            ValidationError::Rejected(errors) => {
                assert_eq!(errors.len(), 2, "errors: {errors:?}");
                assert_eq!((errors[0].row, errors[0].field.as_str()), (1, channels::PITCH));
                assert_eq!(
                    (errors[1].row, errors[1].field.as_str()),
                    (2, channels::TIME_STAMP)
                );
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_range_violation_flagged_not_clamped() {
        let mut values: Vec<String> = nominal_row(1000).split(',').map(String::from).collect();
        values[10] = "120.0".to_string(); // Pitch far past feather
        let csv = format!("{}\n{}\n", header(), values.join(","));

        let report = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).expect("valid");
        assert_eq!(report.records[0].pitch, Some(120.0), "value must not be clamped");
        assert_eq!(report.range_warnings.len(), 1);
        assert!(report.range_warnings[0].contains(channels::PITCH));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = parse_csv_batch(b"", &TurbineConfig::default()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyBatch));

        let header_only = format!("{}\n", header());
        let err = parse_csv_batch(header_only.as_bytes(), &TurbineConfig::default()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyBatch));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = format!("\n{}\n\n{}\n\n", header(), nominal_row(1000));
        let report = parse_csv_batch(csv.as_bytes(), &TurbineConfig::default()).expect("valid");
        assert_eq!(report.records.len(), 1);
    }
}
