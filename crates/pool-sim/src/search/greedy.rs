//! Greedy walk through control-parameter space.
//!
//! Each iteration evaluates the current triple and moves it:
//!
//! | Last health cost | Move                                                          |
//! |------------------|---------------------------------------------------------------|
//! | > 0              | raise γH to its cap, then γM (while it has room), then γL     |
//! | = 0              | raise γM and back γH off, or raise γL and back γM and γH off  |
//!
//! γM has room while `γM < γH - gap` and `γM < γM cap`.  A plateau (costs
//! strictly rising over the window) skips the axis currently being raised
//! until health cost next reaches zero.

use pool_models::ControlParameters;

use super::{MinimumTracker, PlateauDetector, SearchOutcome};
use crate::{Sim, SimObserver, SimResult};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GreedySearch {
    pub seed:            ControlParameters,
    pub step:            f64,
    pub gamma_h_cap:     f64,
    pub gamma_m_cap:     f64,
    /// Minimum distance kept between γM and γH when raising γM.
    pub gap:             f64,
    pub gamma_h_backoff: f64,
    pub gamma_m_backoff: f64,
    /// Stop once γL exceeds this.
    pub gamma_l_limit:   f64,
    /// Stop once γM or γH falls below this.
    pub floor:           f64,
    pub plateau_window:  usize,
    pub max_iterations:  usize,
}

impl Default for GreedySearch {
    fn default() -> Self {
        Self {
            seed:            ControlParameters::new(4.0, 20.0, 160.0),
            step:            2.0,
            gamma_h_cap:     180.0,
            gamma_m_cap:     70.0,
            gap:             5.0,
            gamma_h_backoff: 20.0,
            gamma_m_backoff: 10.0,
            gamma_l_limit:   16.0,
            floor:           10.0,
            plateau_window:  PlateauDetector::DEFAULT_WINDOW,
            max_iterations:  500,
        }
    }
}

impl GreedySearch {
    pub fn with_seed(mut self, seed: ControlParameters) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn is_terminal(&self, c: ControlParameters) -> bool {
        c.gamma_l > self.gamma_l_limit || c.gamma_m < self.floor || c.gamma_h < self.floor
    }

    /// The triple after `c`, given the last evaluated health cost.
    ///
    /// `skipped` counts the axes abandoned by plateau cut-offs (0 to 2); it
    /// is cleared when health cost is zero.
    pub fn next(&self, c: ControlParameters, health: f64, skipped: &mut usize) -> ControlParameters {
        let ControlParameters { mut gamma_l, mut gamma_m, mut gamma_h } = c;
        let m_has_room = gamma_m < gamma_h - self.gap && gamma_m < self.gamma_m_cap;

        if health > 0.0 {
            if *skipped == 0 && gamma_h < self.gamma_h_cap {
                gamma_h += self.step;
            } else if *skipped <= 1 && m_has_room {
                gamma_m += self.step;
            } else {
                gamma_l += self.step;
            }
        } else {
            *skipped = 0;
            if m_has_room {
                gamma_m += self.step;
            } else {
                gamma_l += self.step;
                gamma_m -= self.gamma_m_backoff;
            }
            gamma_h -= self.gamma_h_backoff;
        }
        ControlParameters::new(gamma_l, gamma_m, gamma_h)
    }

    pub fn run<O: SimObserver>(&self, sim: &Sim, observer: &mut O) -> SimResult<SearchOutcome> {
        let mut tracker = MinimumTracker::new(observer);
        let mut plateau = PlateauDetector::new(self.plateau_window);
        let mut skipped = 0usize;
        let mut health = 0.0;
        let mut current = self.seed;

        for iteration in 0..self.max_iterations {
            if self.is_terminal(current) {
                log::debug!("greedy search stopped at {current} after {iteration} iterations");
                break;
            }
            if current.is_ordered() {
                let cost = sim.evaluate_control(current)?;
                tracker.push(current, cost);
                health = cost.health;
                if plateau.push(cost.total) {
                    skipped = (skipped + 1).min(2);
                    plateau.reset();
                    log::debug!("plateau at {current}; skipping {skipped} axis(es)");
                }
            } else {
                log::debug!("skipping unordered triple {current}");
            }
            current = self.next(current, health, &mut skipped);
        }
        if !self.is_terminal(current) {
            log::warn!("greedy search hit the iteration cap ({}) at {current}", self.max_iterations);
        }
        Ok(tracker.finish())
    }
}
