//! Per-date reduction of one run.

use pool_core::{Buckets, Grouping, TimeGrid};
use pool_models::StepRecord;
use pool_occupancy::{bather_load, Occupant};

use crate::DailySummaryRow;

/// Daily rows plus the run-wide TCM peak.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub days:    Vec<DailySummaryRow>,
    /// µg/L, 0 for an empty run.
    pub max_tcm: f64,
}

impl RunSummary {
    /// Dates whose TCM peak exceeded the threshold.
    pub fn exceeded_days(&self) -> usize {
        self.days.iter().filter(|d| d.tcm_exceeded).count()
    }
}

/// Reduce `records` (aligned with `grid`) to one row per calendar date.
///
/// Arrivals are counted on the date they fall on; water and TOC are summed
/// and TCM is maximised over the steps of each date.
pub fn daily_summaries(
    grid:          &TimeGrid,
    occupants:     &[Occupant],
    records:       &[StepRecord],
    tcm_threshold: f64,
) -> RunSummary {
    let buckets = Buckets::new(grid, Grouping::Day);
    let series = |f: fn(&StepRecord) -> f64| records.iter().map(f).collect::<Vec<_>>();

    let arrivals = bather_load(grid, occupants, Grouping::Day);
    let water_in = buckets.sum(&series(|r| r.inflow));
    let evaporated = buckets.sum(&series(|r| r.evaporation));
    let drained = buckets.sum(&series(|r| r.outflow));
    let toc_added = buckets.sum(&series(|r| r.new_toc));
    let tcm = series(|r| r.tcm);
    let max_tcm = buckets.max(&tcm);

    let days = buckets
        .dates()
        .iter()
        .enumerate()
        .map(|(i, &date)| DailySummaryRow {
            date,
            arrivals:           arrivals[i],
            water_in_l:         water_in[i],
            water_evaporated_l: evaporated[i],
            water_drained_l:    drained[i],
            max_tcm:            max_tcm[i],
            toc_added_mg:       toc_added[i],
            tcm_exceeded:       max_tcm[i] > tcm_threshold,
        })
        .collect();

    RunSummary { days, max_tcm: tcm.iter().copied().fold(0.0, f64::max) }
}
