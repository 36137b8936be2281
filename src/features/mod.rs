//! Feature Extractor
//!
//! Derives a `FeatureVector` from one record and its trailing window of up
//! to W prior records from the same batch. Derivation is a pure function:
//! identical inputs always yield identical features, which keeps batch
//! analysis reproducible and auditable.
//!
//! Windowed features are only computed once the window holds at least
//! `min_trend_samples` usable values; before that they are marked
//! unavailable (`None`), never zero-filled.

use crate::config::TurbineConfig;
use crate::types::{FeatureVector, SensorRecord};
use statrs::statistics::Statistics;

/// Load factor below which the pitch-to-power ratio is not meaningful
/// (dividing by near-zero output would explode the feature).
const MIN_LOAD_FACTOR_FOR_PITCH_RATIO: f64 = 0.05;

/// Derives feature vectors against a read-only configuration.
pub struct FeatureExtractor<'a> {
    config: &'a TurbineConfig,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(config: &'a TurbineConfig) -> Self {
        Self { config }
    }

    /// Extract features for the last record of `window`.
    ///
    /// `window` is the trailing slice ending at the record under analysis
    /// (at most `window_samples` records; the caller slices the batch).
    /// Must not be empty.
    pub fn extract(&self, window: &[SensorRecord]) -> FeatureVector {
        let Some(current) = window.last() else {
            return FeatureVector::default();
        };

        let mut fv = FeatureVector {
            load_factor: current.load_factor(),
            pitch_power_ratio: pitch_power_ratio(current),
            phase_temp_spread: current.phase_temp_spread(),
            gearbox_temp_delta: current.gearbox_temp_delta(),
            yaw_misalignment: current.yaw_misalignment(),
            wind_speed: current.wind_speed,
            window_len: window.len(),
            ..Default::default()
        };

        let min_samples = self.config.window.min_trend_samples;
        if window.len() >= 2 {
            let wind: Vec<f64> = window.iter().filter_map(|r| r.wind_speed).collect();
            if wind.len() >= min_samples {
                let mean = wind.iter().mean();
                let sd = wind.iter().std_dev();
                fv.wind_speed_mean = mean.is_finite().then_some(mean);
                fv.wind_speed_sd = sd.is_finite().then_some(sd);
            }

            fv.gear_bear_temp_trend =
                series_trend(window.iter().map(|r| r.gear_bear_temp), min_samples);
            fv.yaw_misalignment_trend =
                series_trend(window.iter().map(|r| r.yaw_misalignment()), min_samples);
        }

        fv
    }
}

/// Pitch angle normalized by load factor (deg). High values mean the blades
/// are pitched out of the wind while output sits well below the interval
/// maximum — the controller is shedding wind.
fn pitch_power_ratio(record: &SensorRecord) -> Option<f64> {
    let pitch = record.pitch?;
    let lf = record.load_factor()?;
    if lf < MIN_LOAD_FACTOR_FOR_PITCH_RATIO {
        return None;
    }
    Some(pitch / lf)
}

/// Least-squares slope over the present values of an optional series,
/// or `None` when fewer than `min_samples` values are usable.
fn series_trend(
    series: impl Iterator<Item = Option<f64>>,
    min_samples: usize,
) -> Option<f64> {
    let values: Vec<f64> = series.flatten().collect();
    if values.len() < min_samples {
        return None;
    }
    Some(trend(&values))
}

/// Calculate linear trend (slope per sample) from a series of values.
///
/// Simple least-squares regression against the sample index.
/// Positive slope = increasing trend, negative = decreasing.
pub fn trend(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return 0.0;
    }

    let n = finite.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = finite.iter().sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &y) in finite.iter().enumerate() {
        let x = i as f64;
        sum_xy += (x - x_mean) * (y - y_mean);
        sum_xx += (x - x_mean) * (x - x_mean);
    }

    if sum_xx.abs() < 1e-10 {
        return 0.0;
    }
    sum_xy / sum_xx
}

// ============================================================================
// Tests
// ============================================================================
