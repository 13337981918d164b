//! Stochastic arrival process.
//!
//! # Algorithm
//!
//! For each grid step starting at `t` the generator walks forward through the
//! step with an accumulated offset `s` (whole seconds):
//!
//! ```text
//! cursor = t, s = 0
//! loop:
//!     draw swimmer at `cursor`           (calendar slots of `cursor`)
//!     s += draw.time_to_arrival
//!     if s >= step: break
//!     arrival = t + s, departure = arrival + draw.stay
//!     cursor = arrival
//! ```
//!
//! A draw is compound: the inter-arrival time is itself normal, and the time
//! to the next arrival is exponential with rate `1 / inter_arrival`.
//!
//! Every activity sample of a stay uses the hourly parameters of the instant
//! the swimmer was drawn at, even when the stay runs into later hours.

use chrono::{Duration, NaiveDateTime};

use pool_core::{OccupantId, PoolError, SimRng, TimeGrid};

use crate::occupant::activity_sample_count;
use crate::{BodySize, Gender, Occupant, OccupancyParameters, OccupancyResult};

/// Lower bound on a normal inter-arrival draw.  The exponential needs a
/// positive mean; tail draws at or below zero are lifted to this.
const MIN_INTER_ARRIVAL_SECS: f64 = 1.0;

/// Lower bound on a stay, so `departure > arrival` always holds.
const MIN_STAY_SECS: i64 = 60;

const MIN_AGE: f64 = 1.0;
const MAX_AGE: f64 = 100.0;

/// One sampled swimmer, before it is placed on the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SwimmerDraw {
    /// Whole seconds from the sampling instant to the arrival.
    pub time_to_arrival_secs: i64,
    pub gender:               Gender,
    pub age:                  u32,
    pub body:                 BodySize,
    pub stay_secs:            i64,
    /// Percent of maximum, one per started grid step of the stay.
    pub activity_levels:      Vec<f64>,
}

/// Draws occupants from [`OccupancyParameters`] with a seeded [`SimRng`].
pub struct OccupancyGenerator {
    params: OccupancyParameters,
    rng:    SimRng,
}

impl OccupancyGenerator {
    pub fn new(params: OccupancyParameters, seed: u64) -> Self {
        Self { params, rng: SimRng::new(seed) }
    }

    pub fn params(&self) -> &OccupancyParameters {
        &self.params
    }

    /// Draw one swimmer using the calendar slots of `now`.
    ///
    /// Fails with `InvalidArgument` if `step_secs` is zero or a table entry
    /// yields an invalid distribution (e.g. a negative standard deviation).
    pub fn sample_swimmer(&mut self, now: NaiveDateTime, step_secs: u32) -> OccupancyResult<SwimmerDraw> {
        if step_secs == 0 {
            return Err(PoolError::InvalidArgument("step_secs must be positive".into()).into());
        }
        let p = &self.params;
        let rng = &mut self.rng;

        // ── Arrival ───────────────────────────────────────────────────────
        let ia = p.inter_arrival(&now);
        let inter_arrival = rng.normal(ia.mean, ia.std)?.max(MIN_INTER_ARRIVAL_SECS);
        let time_to_arrival = rng.exponential(1.0 / inter_arrival)?;

        // ── Demographics ──────────────────────────────────────────────────
        let gender = if rng.uniform() < p.male_probability(&now) {
            Gender::Male
        } else {
            Gender::Female
        };
        let adult = rng.uniform() < p.adult_probability(&now);
        let age_dist = p.age(&now, adult);
        let age = rng.normal(age_dist.mean, age_dist.std)?.clamp(MIN_AGE, MAX_AGE);
        let body = p.physical.lookup(age, gender);

        // ── Stay and activity ─────────────────────────────────────────────
        let stay_dist = p.stay_secs(&now);
        let stay_secs = (rng.normal(stay_dist.mean, stay_dist.std)? as i64).max(MIN_STAY_SECS);

        let activity = p.activity(&now);
        let samples = activity_sample_count(stay_secs, step_secs);
        let mut activity_levels = Vec::with_capacity(samples);
        for _ in 0..samples {
            let level = rng.normal(activity.mean, activity.std)?.clamp(0.0, 1.0);
            activity_levels.push(level * 100.0);
        }

        Ok(SwimmerDraw {
            time_to_arrival_secs: time_to_arrival as i64,
            gender,
            age: age as u32,
            body,
            stay_secs,
            activity_levels,
        })
    }

    /// Generate every occupant arriving within `grid`, in arrival order.
    pub fn generate(&mut self, grid: &TimeGrid) -> OccupancyResult<Vec<Occupant>> {
        let step = grid.step_secs() as i64;
        let mut occupants = Vec::new();

        for t in grid.iter() {
            let mut cursor = t;
            let mut offset = 0i64;
            loop {
                let draw = self.sample_swimmer(cursor, grid.step_secs())?;
                offset += draw.time_to_arrival_secs;
                if offset >= step {
                    break;
                }
                let arrival = t + Duration::seconds(offset);
                let id = OccupantId::try_from(occupants.len()).map_err(|_| {
                    PoolError::InvalidArgument("occupant count exceeds u32".into())
                })?;
                occupants.push(Occupant::new(
                    id,
                    arrival,
                    draw.stay_secs,
                    draw.gender,
                    draw.age,
                    draw.body,
                    draw.activity_levels,
                ));
                cursor = arrival;
            }
        }

        log::info!(
            "generated {} occupants over {} steps ({} .. {})",
            occupants.len(),
            grid.len(),
            grid.start(),
            grid.end()
        );
        Ok(occupants)
    }
}
