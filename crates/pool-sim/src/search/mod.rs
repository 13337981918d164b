//! Control-parameter search over a built [`Sim`][crate::Sim].
//!
//! Both [`GridSearch`] and [`GreedySearch`] feed their evaluations, in
//! enumeration order, through one running-minimum tracker so that the
//! resulting [`SearchOutcome`] does not depend on how candidates were
//! scheduled.

pub mod greedy;
pub mod grid;
pub mod plateau;
pub mod surrogate;

pub use greedy::GreedySearch;
pub use grid::GridSearch;
pub use plateau::PlateauDetector;
pub use surrogate::{Surrogate, SurrogateEstimate, SurrogateScan};

use pool_models::ControlParameters;

use crate::{CostBreakdown, CostRecord, SimObserver};

/// Every candidate a search evaluated, plus the cheapest one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchOutcome {
    /// Lowest-cost record; ties keep the earliest.  `None` if nothing ran.
    pub best:    Option<CostRecord>,
    /// All records in evaluation order.
    pub history: Vec<CostRecord>,
}

impl SearchOutcome {
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

// ── Running minimum ───────────────────────────────────────────────────────────

pub(crate) struct MinimumTracker<'o, O: SimObserver> {
    observer: &'o mut O,
    outcome:  SearchOutcome,
}

impl<'o, O: SimObserver> MinimumTracker<'o, O> {
    pub(crate) fn new(observer: &'o mut O) -> Self {
        Self { observer, outcome: SearchOutcome::default() }
    }

    pub(crate) fn push(&mut self, control: ControlParameters, cost: CostBreakdown) -> CostRecord {
        let improvement = self.outcome.best.map_or(0.0, |b| b.cost - cost.total);
        let record = CostRecord::new(control, cost, improvement);
        self.observer.on_candidate(&record);

        if self.outcome.best.is_none() || improvement > 0.0 {
            log::info!(
                "new minimum {:.4} at {control} (water {:.3} m³, health {:.4})",
                record.cost,
                record.water_use,
                record.health_cost
            );
            self.outcome.best = Some(record);
            self.observer.on_new_minimum(&record);
        }
        self.outcome.history.push(record);
        record
    }

    pub(crate) fn finish(self) -> SearchOutcome {
        self.observer.on_search_end(self.outcome.best.as_ref());
        log::info!("search finished after {} evaluations", self.outcome.len());
        self.outcome
    }
}
