//! Observer hooks for scenario runs and searches.

use chrono::NaiveDateTime;

use pool_core::TimeGrid;
use pool_models::StepRecord;

use crate::{CostBreakdown, CostRecord};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and the search
/// strategies.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Searches do not report individual
/// steps; only [`Sim::run`][crate::Sim::run] does.
///
/// # Example — TCM alarm
///
/// ```rust,ignore
/// struct TcmAlarm { threshold: f64, hits: usize }
///
/// impl SimObserver for TcmAlarm {
///     fn on_step(&mut self, _i: usize, _t: NaiveDateTime, _bathers: u32, r: &StepRecord) {
///         if r.tcm > self.threshold {
///             self.hits += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the first step of a run.
    fn on_run_start(&mut self, _policy: &str, _grid: &TimeGrid) {}

    /// Called once per step, in order, with the state after the step.
    fn on_step(&mut self, _index: usize, _time: NaiveDateTime, _bathers: u32, _record: &StepRecord) {}

    /// Called after the last step of a run.
    fn on_run_end(&mut self, _policy: &str, _cost: &CostBreakdown) {}

    /// Called for every candidate a search evaluates, in enumeration order.
    fn on_candidate(&mut self, _record: &CostRecord) {}

    /// Called when a candidate lowers the running minimum.
    fn on_new_minimum(&mut self, _record: &CostRecord) {}

    /// Called once when a search finishes.
    fn on_search_end(&mut self, _best: Option<&CostRecord>) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
