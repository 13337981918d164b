//! Body-fluid (sweat) release.
//!
//! Normalized sweat rate, litres per m² of skin, for `secs` seconds of
//! swimming at activity `A` (percent of VO2 max) in water at `T` °C:
//!
//! ```text
//! rate = (a + b * exp(β1 (T - T0) + β2 (A/100 - A0))) * secs / time_base
//! ```
//!
//! The release for one occupant-step is `rate * body_surface_area`.  An
//! occupant contributes at step `t` only while strictly inside the visit
//! (`arrival < t < departure`), with `secs = min(step, t - arrival)`.

use pool_core::TimeGrid;
use pool_occupancy::Occupant;

/// Empirical sweat-rate coefficients.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweatParameters {
    pub a:              f64,
    pub b:              f64,
    pub beta1:          f64,
    pub beta2:          f64,
    /// Reference water temperature, °C.
    pub t0:             f64,
    /// Reference activity, fraction of VO2 max.
    pub a0:             f64,
    pub time_base_secs: f64,
}

impl Default for SweatParameters {
    fn default() -> Self {
        Self {
            a:              0.18,
            b:              0.0146,
            beta1:          0.3882,
            beta2:          11.1848,
            t0:             29.0,
            a0:             0.71,
            time_base_secs: 3600.0,
        }
    }
}

impl SweatParameters {
    /// Sweat litres per m² over `secs` seconds at `activity_pct` (0–100).
    #[inline]
    pub fn normalized_rate(&self, activity_pct: f64, water_temp_c: f64, secs: f64) -> f64 {
        let exponent =
            self.beta1 * (water_temp_c - self.t0) + self.beta2 * (activity_pct / 100.0 - self.a0);
        (self.a + self.b * exponent.exp()) * (secs / self.time_base_secs)
    }
}

/// Sweat release at a fixed water temperature.
#[derive(Copy, Clone, Debug)]
pub struct BodyFluidModel {
    pub params:       SweatParameters,
    pub water_temp_c: f64,
}

impl BodyFluidModel {
    pub fn new(water_temp_c: f64) -> Self {
        Self { params: SweatParameters::default(), water_temp_c }
    }

    pub fn with_params(mut self, params: SweatParameters) -> Self {
        self.params = params;
        self
    }

    /// Total release (litres) per grid step, summed over all occupants.
    pub fn release(&self, grid: &TimeGrid, occupants: &[Occupant]) -> Vec<f64> {
        let step = grid.step_secs() as i64;
        let len = grid.len() as i64;
        let mut out = vec![0.0; grid.len()];

        for o in occupants {
            let a = grid.offset_secs(o.arrival);
            let d = grid.offset_secs(o.departure);
            // i*step > a  and  i*step < d
            let first = (a.div_euclid(step) + 1).max(0);
            let last = (d + step - 1).div_euclid(step).min(len);
            let bsa = o.body_surface_area();

            for i in first..last {
                let secs = i * step - a;
                let Some(level) = o.activity_at((secs / step) as usize) else {
                    continue;
                };
                let present = secs.min(step) as f64;
                out[i as usize] += bsa * self.params.normalized_rate(level, self.water_temp_c, present);
            }
        }
        out
    }
}

/// [`BodyFluidModel::release`] with the default coefficients.
pub fn body_fluid_release(grid: &TimeGrid, occupants: &[Occupant], water_temp_c: f64) -> Vec<f64> {
    BodyFluidModel::new(water_temp_c).release(grid, occupants)
}
