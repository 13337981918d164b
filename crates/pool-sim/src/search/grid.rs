//! Exhaustive search over ordered `(γL, γM, γH)` triples.
//!
//! The grid is walked as rows of fixed `(γL, γM)`; within a row `γH`
//! increases and the row is abandoned once costs climb for
//! [`PlateauDetector::DEFAULT_WINDOW`] evaluations in a row.  Rows are
//! independent, so under the `parallel` feature they run on Rayon's pool.
//! Their results are merged in row order either way.

use pool_models::ControlParameters;

use super::{MinimumTracker, PlateauDetector, SearchOutcome};
use crate::{CostBreakdown, SearchRanges, Sim, SimObserver, SimResult};

#[derive(Clone, Debug, PartialEq)]
pub struct GridSearch {
    pub gamma_l:        Vec<f64>,
    pub gamma_m:        Vec<f64>,
    pub gamma_h:        Vec<f64>,
    pub plateau_window: usize,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self::from_ranges(&SearchRanges::default())
    }
}

impl GridSearch {
    pub fn from_ranges(ranges: &SearchRanges) -> Self {
        Self {
            gamma_l:        ranges.gamma_l.values(),
            gamma_m:        ranges.gamma_m.values(),
            gamma_h:        ranges.gamma_h.values(),
            plateau_window: PlateauDetector::DEFAULT_WINDOW,
        }
    }

    pub fn with_plateau_window(mut self, window: usize) -> Self {
        self.plateau_window = window;
        self
    }

    /// Every strictly ordered triple, in evaluation order.
    pub fn candidates(&self) -> Vec<ControlParameters> {
        self.rows()
            .into_iter()
            .flat_map(|(l, m)| {
                self.gamma_h
                    .iter()
                    .filter(move |&&h| h > m)
                    .map(move |&h| ControlParameters::new(l, m, h))
            })
            .collect()
    }

    /// `candidates().len()` without building the triples.
    pub fn candidate_count(&self) -> usize {
        self.gamma_l
            .iter()
            .flat_map(|&l| self.gamma_m.iter().filter(move |&&m| m > l))
            .map(|&m| self.gamma_h.iter().filter(|&&h| h > m).count())
            .sum()
    }

    fn rows(&self) -> Vec<(f64, f64)> {
        self.gamma_l
            .iter()
            .flat_map(|&l| self.gamma_m.iter().filter(move |&&m| m > l).map(move |&m| (l, m)))
            .collect()
    }

    fn run_row(&self, sim: &Sim, l: f64, m: f64) -> SimResult<Vec<(ControlParameters, CostBreakdown)>> {
        let mut plateau = PlateauDetector::new(self.plateau_window);
        let mut out = Vec::new();
        for &h in self.gamma_h.iter().filter(|&&h| h > m) {
            let control = ControlParameters::new(l, m, h);
            let cost = sim.evaluate_control(control)?;
            out.push((control, cost));
            if plateau.push(cost.total) {
                log::debug!("plateau at {control}; next row");
                break;
            }
        }
        Ok(out)
    }

    pub fn run<O: SimObserver>(&self, sim: &Sim, observer: &mut O) -> SimResult<SearchOutcome> {
        let rows = self.rows();
        log::info!("grid search: {} rows, up to {} candidates", rows.len(), self.candidate_count());

        #[cfg(feature = "parallel")]
        let results: Vec<_> = {
            use rayon::prelude::*;

            rows.par_iter().map(|&(l, m)| self.run_row(sim, l, m)).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = rows.iter().map(|&(l, m)| self.run_row(sim, l, m)).collect();

        let mut tracker = MinimumTracker::new(observer);
        for row in results {
            for (control, cost) in row? {
                tracker.push(control, cost);
            }
        }
        Ok(tracker.finish())
    }
}
