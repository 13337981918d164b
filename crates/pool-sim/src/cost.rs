//! Cost of one simulated run.
//!
//! ```text
//! water  = 0.001 * Σ inflow                               (m³)
//! health = Σ bathers_i * (tcm_i - θ) / θ    over steps with tcm_i > θ
//! cost   = water + λ * health / (3600 / step)
//! ```
//!
//! Dividing by `3600 / step` turns the per-step health sum into
//! bather-hours, so the cost does not depend on the step length.

use serde::{Deserialize, Serialize};

use pool_models::{ControlParameters, StepRecord};

use crate::{SimError, SimResult};

const LITRES_TO_M3: f64 = 0.001;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostFunction {
    pub lambda:        f64,
    pub tcm_threshold: f64,
    pub step_secs:     u32,
}

/// The terms of one cost evaluation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CostBreakdown {
    /// Fresh water used, m³.
    pub water_m3: f64,
    /// Raw health sum, bather-steps above threshold (relative exceedance).
    pub health:   f64,
    pub total:    f64,
}

impl CostFunction {
    /// Steps per hour.
    #[inline]
    pub fn time_adjustment(&self) -> f64 {
        3600.0 / self.step_secs as f64
    }

    /// Combine water and raw health terms into a cost.
    #[inline]
    pub fn combine(&self, water_m3: f64, health: f64) -> CostBreakdown {
        CostBreakdown {
            water_m3,
            health,
            total: water_m3 + self.lambda * health / self.time_adjustment(),
        }
    }

    pub fn evaluate(
        &self,
        inflow:      &[f64],
        bather_load: &[u32],
        records:     &[StepRecord],
    ) -> SimResult<CostBreakdown> {
        if bather_load.len() != records.len() {
            return Err(SimError::LengthMismatch {
                expected: records.len(),
                got:      bather_load.len(),
                what:     "bather load",
            });
        }
        let water_m3 = LITRES_TO_M3 * inflow.iter().sum::<f64>();

        let theta = self.tcm_threshold;
        let health = records
            .iter()
            .zip(bather_load)
            .filter(|(r, _)| r.tcm > theta)
            .map(|(r, &n)| n as f64 * (r.tcm - theta) / theta)
            .sum();

        Ok(self.combine(water_m3, health))
    }
}

/// One evaluated candidate, as stored and reloaded for the surrogate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub cost:        f64,
    pub gamma_l:     f64,
    pub gamma_m:     f64,
    pub gamma_h:     f64,
    /// m³
    pub water_use:   f64,
    /// Raw health sum (not divided by steps per hour).
    pub health_cost: f64,
    /// Running minimum before this candidate minus its cost; positive when
    /// the candidate set a new minimum.  Zero for the first candidate.
    pub improvement: f64,
}

impl CostRecord {
    pub fn new(control: ControlParameters, cost: CostBreakdown, improvement: f64) -> Self {
        Self {
            cost:        cost.total,
            gamma_l:     control.gamma_l,
            gamma_m:     control.gamma_m,
            gamma_h:     control.gamma_h,
            water_use:   cost.water_m3,
            health_cost: cost.health,
            improvement,
        }
    }

    pub fn control(&self) -> ControlParameters {
        ControlParameters::new(self.gamma_l, self.gamma_m, self.gamma_h)
    }
}
