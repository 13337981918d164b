//! Scenario configuration.
//!
//! A [`ScenarioConfig`] is read from JSON.  Every field has a default, so a
//! file only needs the values that differ:
//!
//! ```json
//! {
//!   "start": "2022/06/01 00:00:00",
//!   "end":   "2022/06/08 00:00:00",
//!   "water_temp_c": 28.0,
//!   "room_temp_c":  29.0,
//!   "initial_chemistry": { "FAC": 1, "TCM": 0.035, "CC": 0, "pH": 7.8, "ORP": 700, "BF": 0.0019 },
//!   "search": { "gamma_h": { "start": 100, "stop": 180, "step": 10 } }
//! }
//! ```

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use pool_core::TimeGrid;
use pool_models::InitialChemistry;

use crate::{SimError, SimResult};

// ── Ranges ────────────────────────────────────────────────────────────────────

/// Half-open arithmetic range `start, start + step, … < stop`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub start: f64,
    pub stop:  f64,
    pub step:  f64,
}

impl ParamRange {
    pub const fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// The values of the range.  Empty if `step <= 0` or `stop <= start`.
    pub fn values(&self) -> Vec<f64> {
        if !(self.step > 0.0) || !(self.stop > self.start) {
            return Vec::new();
        }
        let n = ((self.stop - self.start) / self.step).ceil() as usize;
        (0..n).map(|i| self.start + i as f64 * self.step).collect()
    }
}

/// Grid-search ranges for the three control thresholds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRanges {
    pub gamma_l: ParamRange,
    pub gamma_m: ParamRange,
    pub gamma_h: ParamRange,
}

impl Default for SearchRanges {
    fn default() -> Self {
        Self {
            gamma_l: ParamRange::new(4.0, 20.0, 4.0),
            gamma_m: ParamRange::new(20.0, 80.0, 10.0),
            gamma_h: ParamRange::new(100.0, 180.0, 10.0),
        }
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// `YYYY/MM/DD hh:mm:ss`
    pub start:             String,
    /// `YYYY/MM/DD hh:mm:ss`, exclusive.
    pub end:               String,
    pub step_secs:         i64,
    pub water_temp_c:      f64,
    pub room_temp_c:       f64,
    /// Relative humidity as a fraction.
    pub room_humidity:     f64,
    pub initial_volume_l:  f64,
    pub min_volume_l:      f64,
    pub max_volume_l:      f64,
    pub surface_area_m2:   f64,
    pub initial_chemistry: InitialChemistry,
    /// Weight of the health term against water use.
    pub lambda:            f64,
    /// TCM concentration above which bathers accrue health cost, µg/L.
    pub tcm_threshold:     f64,
    pub seed:              u64,
    pub search:            SearchRanges,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            start:             "2022/06/01 00:00:00".into(),
            end:               "2022/06/08 00:00:00".into(),
            step_secs:         360,
            water_temp_c:      30.0,
            room_temp_c:       30.0,
            room_humidity:     0.5,
            initial_volume_l:  200_000.0,
            min_volume_l:      150_000.0,
            max_volume_l:      250_000.0,
            surface_area_m2:   150.0,
            initial_chemistry: InitialChemistry::default(),
            lambda:            1.0,
            tcm_threshold:     100.0,
            seed:              42,
            search:            SearchRanges::default(),
        }
    }
}

impl ScenarioConfig {
    /// Parse `start` / `end` and build the time grid.
    pub fn grid(&self) -> SimResult<TimeGrid> {
        Ok(TimeGrid::from_text(&self.start, &self.end, self.step_secs)?)
    }

    /// Check the values no model validates on its own.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.tcm_threshold > 0.0) {
            return Err(SimError::Config(format!(
                "tcm_threshold must be positive, got {}",
                self.tcm_threshold
            )));
        }
        if !(self.lambda >= 0.0) {
            return Err(SimError::Config(format!("lambda must be non-negative, got {}", self.lambda)));
        }
        if !(self.initial_volume_l > 0.0) {
            return Err(SimError::Config(format!(
                "initial_volume_l must be positive, got {}",
                self.initial_volume_l
            )));
        }
        for (name, r) in [
            ("gamma_l", self.search.gamma_l),
            ("gamma_m", self.search.gamma_m),
            ("gamma_h", self.search.gamma_h),
        ] {
            if !(r.step > 0.0) {
                return Err(SimError::Config(format!("search.{name}.step must be positive")));
            }
        }
        Ok(())
    }
}

pub fn load_scenario(path: &Path) -> SimResult<ScenarioConfig> {
    let file = std::fs::File::open(path)?;
    load_scenario_reader(std::io::BufReader::new(file))
}

pub fn load_scenario_reader<R: Read>(reader: R) -> SimResult<ScenarioConfig> {
    let config: ScenarioConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}
