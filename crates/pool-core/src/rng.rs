//! Deterministic simulation RNG.
//!
//! One `SmallRng` seeded from the scenario seed drives the whole occupancy
//! process, so a seed reproduces the population exactly.
//!
//! Distribution parameters are checked here before they reach `rand_distr`,
//! which would otherwise sample a mirrored normal for a negative `std`.  Bad
//! parameters surface as [`PoolError::InvalidArgument`] instead of panics or
//! silent draws.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};

use crate::{PoolError, PoolResult};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen()
    }

    /// Gaussian draw.  `mean` must be finite, `std` finite and non-negative.
    pub fn normal(&mut self, mean: f64, std: f64) -> PoolResult<f64> {
        if !(mean.is_finite() && std.is_finite() && std >= 0.0) {
            return Err(PoolError::InvalidArgument(format!(
                "normal(mean={mean}, std={std}): std must be finite and non-negative"
            )));
        }
        let dist = Normal::new(mean, std).map_err(|e| {
            PoolError::InvalidArgument(format!("normal(mean={mean}, std={std}): {e}"))
        })?;
        Ok(dist.sample(&mut self.0))
    }

    /// Exponential draw with the given `rate` (mean `1 / rate`).  `rate` must
    /// be finite and positive.
    pub fn exponential(&mut self, rate: f64) -> PoolResult<f64> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(PoolError::InvalidArgument(format!(
                "exponential(rate={rate}): rate must be finite and positive"
            )));
        }
        let dist = Exp::new(rate).map_err(|e| {
            PoolError::InvalidArgument(format!("exponential(rate={rate}): {e}"))
        })?;
        Ok(dist.sample(&mut self.0))
    }
}
