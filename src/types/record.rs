//! SCADA sensor record types
//!
//! One `SensorRecord` is a single 10-minute (or faster) SCADA observation
//! with 21 numeric channels plus the timestamp. Channels are `Option<f64>`:
//! `None` means the cell was empty or a missing-value sentinel. Missing is
//! never silently converted to zero.

use serde::{Deserialize, Serialize};

/// Canonical SCADA channel names as they appear in CSV headers and
/// manual-entry field maps. Matching is exact and case-sensitive.
pub mod channels {
    pub const TIME_STAMP: &str = "time_stamp";
    pub const WIND_SPEED: &str = "WindSpeed";
    pub const STD_DEV_WIND_SPEED: &str = "StdDevWindSpeed";
    pub const WIND_DIR_ABS: &str = "WindDirAbs";
    pub const WIND_DIR_REL: &str = "WindDirRel";
    pub const POWER: &str = "Power";
    pub const MAX_POWER: &str = "MaxPower";
    pub const MIN_POWER: &str = "MinPower";
    pub const STD_DEV_POWER: &str = "StdDevPower";
    pub const AVG_R_POW: &str = "AvgRPow";
    pub const PITCH: &str = "Pitch";
    pub const GEN_RPM: &str = "GenRPM";
    pub const ROTOR_RPM: &str = "RotorRPM";
    pub const ENVIR_TEMP: &str = "EnvirTemp";
    pub const NACEL_TEMP: &str = "NacelTemp";
    pub const GEAR_OIL_TEMP: &str = "GearOilTemp";
    pub const GEAR_BEAR_TEMP: &str = "GearBearTemp";
    pub const GEN_TEMP: &str = "GenTemp";
    pub const GEN_PH1_TEMP: &str = "GenPh1Temp";
    pub const GEN_PH2_TEMP: &str = "GenPh2Temp";
    pub const GEN_PH3_TEMP: &str = "GenPh3Temp";
    pub const GEN_BEAR_TEMP: &str = "GenBearTemp";

    /// All 22 recognized field names. A CSV header must contain every one
    /// of these (order-independent) to pass validation.
    pub const ALL: [&str; 22] = [
        TIME_STAMP,
        WIND_SPEED,
        STD_DEV_WIND_SPEED,
        WIND_DIR_ABS,
        WIND_DIR_REL,
        POWER,
        MAX_POWER,
        MIN_POWER,
        STD_DEV_POWER,
        AVG_R_POW,
        PITCH,
        GEN_RPM,
        ROTOR_RPM,
        ENVIR_TEMP,
        NACEL_TEMP,
        GEAR_OIL_TEMP,
        GEAR_BEAR_TEMP,
        GEN_TEMP,
        GEN_PH1_TEMP,
        GEN_PH2_TEMP,
        GEN_PH3_TEMP,
        GEN_BEAR_TEMP,
    ];

    /// Channels the classifier cannot work without. A record missing any of
    /// these values resolves to `Unknown` (insufficient data), not an error.
    pub const MANDATORY: [&str; 5] = [
        WIND_SPEED,
        POWER,
        MAX_POWER,
        GEAR_OIL_TEMP,
        GEAR_BEAR_TEMP,
    ];
}

/// One validated SCADA observation.
///
/// Channel units follow the turbine SCADA export convention: wind speeds in
/// m/s, directions in degrees, powers in kW, pitch in degrees, rotational
/// speeds in RPM, temperatures in °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Unix timestamp (seconds). Strictly increasing within a batch.
    pub time_stamp: u64,

    // === Wind ===
    /// Average wind speed (m/s)
    pub wind_speed: Option<f64>,
    /// Wind speed standard deviation over the averaging interval (m/s)
    pub std_dev_wind_speed: Option<f64>,
    /// Absolute wind direction (deg, 0-360)
    pub wind_dir_abs: Option<f64>,
    /// Wind direction relative to nacelle heading (deg)
    pub wind_dir_rel: Option<f64>,

    // === Power ===
    /// Average active power (kW)
    pub power: Option<f64>,
    /// Maximum active power over the interval (kW)
    pub max_power: Option<f64>,
    /// Minimum active power over the interval (kW)
    pub min_power: Option<f64>,
    /// Active power standard deviation (kW)
    pub std_dev_power: Option<f64>,
    /// Average reactive power (kVAr)
    pub avg_r_pow: Option<f64>,

    // === Drivetrain ===
    /// Blade pitch angle (deg)
    pub pitch: Option<f64>,
    /// Generator shaft speed (RPM)
    pub gen_rpm: Option<f64>,
    /// Rotor (main shaft) speed (RPM)
    pub rotor_rpm: Option<f64>,

    // === Temperatures ===
    /// Ambient temperature outside the nacelle (°C)
    pub envir_temp: Option<f64>,
    /// Nacelle internal temperature (°C)
    pub nacel_temp: Option<f64>,
    /// Gearbox oil sump temperature (°C)
    pub gear_oil_temp: Option<f64>,
    /// Gearbox bearing temperature (°C)
    pub gear_bear_temp: Option<f64>,
    /// Generator stator temperature (°C)
    pub gen_temp: Option<f64>,
    /// Generator phase 1 winding temperature (°C)
    pub gen_ph1_temp: Option<f64>,
    /// Generator phase 2 winding temperature (°C)
    pub gen_ph2_temp: Option<f64>,
    /// Generator phase 3 winding temperature (°C)
    pub gen_ph3_temp: Option<f64>,
    /// Generator bearing temperature (°C)
    pub gen_bear_temp: Option<f64>,
}

impl Default for SensorRecord {
    fn default() -> Self {
        Self {
            time_stamp: 0,
            wind_speed: None,
            std_dev_wind_speed: None,
            wind_dir_abs: None,
            wind_dir_rel: None,
            power: None,
            max_power: None,
            min_power: None,
            std_dev_power: None,
            avg_r_pow: None,
            pitch: None,
            gen_rpm: None,
            rotor_rpm: None,
            envir_temp: None,
            nacel_temp: None,
            gear_oil_temp: None,
            gear_bear_temp: None,
            gen_temp: None,
            gen_ph1_temp: None,
            gen_ph2_temp: None,
            gen_ph3_temp: None,
            gen_bear_temp: None,
        }
    }
}

impl SensorRecord {
    /// Gearbox temperature delta: bearing minus oil sump (°C).
    /// A healthy gearbox keeps the bearing close to the oil temperature.
    pub fn gearbox_temp_delta(&self) -> Option<f64> {
        Some(self.gear_bear_temp? - self.gear_oil_temp?)
    }

    /// Inter-phase winding temperature spread: max − min across the three
    /// generator phases (°C).
    pub fn phase_temp_spread(&self) -> Option<f64> {
        let (p1, p2, p3) = (self.gen_ph1_temp?, self.gen_ph2_temp?, self.gen_ph3_temp?);
        Some(p1.max(p2).max(p3) - p1.min(p2).min(p3))
    }

    /// Yaw misalignment magnitude: circular difference between absolute and
    /// relative wind direction, folded to [0, 180] degrees.
    pub fn yaw_misalignment(&self) -> Option<f64> {
        let diff = (self.wind_dir_abs? - self.wind_dir_rel?).rem_euclid(360.0);
        Some(if diff > 180.0 { 360.0 - diff } else { diff })
    }

    /// Load factor: average power over interval maximum.
    /// `None` when MaxPower is missing or too small to divide by.
    pub fn load_factor(&self) -> Option<f64> {
        let max = self.max_power?;
        if max.abs() < 1e-6 {
            return None;
        }
        Some(self.power? / max)
    }

    /// Set a channel by its canonical name. Returns `false` for names
    /// outside the recognized channel set (`time_stamp` included — the
    /// timestamp is not a numeric channel).
    pub fn set_channel(&mut self, name: &str, value: Option<f64>) -> bool {
        let slot = match name {
            channels::WIND_SPEED => &mut self.wind_speed,
            channels::STD_DEV_WIND_SPEED => &mut self.std_dev_wind_speed,
            channels::WIND_DIR_ABS => &mut self.wind_dir_abs,
            channels::WIND_DIR_REL => &mut self.wind_dir_rel,
            channels::POWER => &mut self.power,
            channels::MAX_POWER => &mut self.max_power,
            channels::MIN_POWER => &mut self.min_power,
            channels::STD_DEV_POWER => &mut self.std_dev_power,
            channels::AVG_R_POW => &mut self.avg_r_pow,
            channels::PITCH => &mut self.pitch,
            channels::GEN_RPM => &mut self.gen_rpm,
            channels::ROTOR_RPM => &mut self.rotor_rpm,
            channels::ENVIR_TEMP => &mut self.envir_temp,
            channels::NACEL_TEMP => &mut self.nacel_temp,
            channels::GEAR_OIL_TEMP => &mut self.gear_oil_temp,
            channels::GEAR_BEAR_TEMP => &mut self.gear_bear_temp,
            channels::GEN_TEMP => &mut self.gen_temp,
            channels::GEN_PH1_TEMP => &mut self.gen_ph1_temp,
            channels::GEN_PH2_TEMP => &mut self.gen_ph2_temp,
            channels::GEN_PH3_TEMP => &mut self.gen_ph3_temp,
            channels::GEN_BEAR_TEMP => &mut self.gen_bear_temp,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Names of mandatory channels that are missing from this record.
    pub fn missing_mandatory(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.wind_speed.is_none() {
            missing.push(channels::WIND_SPEED);
        }
        if self.power.is_none() {
            missing.push(channels::POWER);
        }
        if self.max_power.is_none() {
            missing.push(channels::MAX_POWER);
        }
        if self.gear_oil_temp.is_none() {
            missing.push(channels::GEAR_OIL_TEMP);
        }
        if self.gear_bear_temp.is_none() {
            missing.push(channels::GEAR_BEAR_TEMP);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gearbox_delta_requires_both_temps() {
        let mut rec = SensorRecord::default();
        assert_eq!(rec.gearbox_temp_delta(), None);

        rec.gear_bear_temp = Some(95.0);
        assert_eq!(rec.gearbox_temp_delta(), None);

        rec.gear_oil_temp = Some(60.0);
        assert_eq!(rec.gearbox_temp_delta(), Some(35.0));
    }

    #[test]
    fn test_phase_spread() {
        let rec = SensorRecord {
            gen_ph1_temp: Some(78.0),
            gen_ph2_temp: Some(81.5),
            gen_ph3_temp: Some(74.0),
            ..Default::default()
        };
        let spread = rec.phase_temp_spread().unwrap();
        assert!((spread - 7.5).abs() < 1e-9, "spread: {}", spread);
    }

    #[test]
    fn test_yaw_misalignment_wraps_circularly() {
        // 350° vs 10° is a 20° misalignment, not 340°
        let rec = SensorRecord {
            wind_dir_abs: Some(350.0),
            wind_dir_rel: Some(10.0),
            ..Default::default()
        };
        let yaw = rec.yaw_misalignment().unwrap();
        assert!((yaw - 20.0).abs() < 1e-9, "yaw: {}", yaw);

        // Symmetric in argument order
        let rec2 = SensorRecord {
            wind_dir_abs: Some(10.0),
            wind_dir_rel: Some(350.0),
            ..Default::default()
        };
        assert!((rec2.yaw_misalignment().unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_factor_guards_small_max_power() {
        let rec = SensorRecord {
            power: Some(500.0),
            max_power: Some(0.0),
            ..Default::default()
        };
        assert_eq!(rec.load_factor(), None);

        let rec = SensorRecord {
            power: Some(450.0),
            max_power: Some(500.0),
            ..Default::default()
        };
        assert!((rec.load_factor().unwrap() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_missing_mandatory_lists_every_gap() {
        let rec = SensorRecord::default();
        let missing = rec.missing_mandatory();
        assert_eq!(missing.len(), channels::MANDATORY.len());
        assert!(missing.contains(&channels::WIND_SPEED));
        assert!(missing.contains(&channels::GEAR_BEAR_TEMP));
    }
}
