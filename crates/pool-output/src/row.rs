//! Plain data row types written by output backends.

use chrono::{NaiveDate, NaiveDateTime};

use pool_models::StepRecord;

/// Column names of the chemistry part of a [`StepRow`], in write order.
pub const STEP_RECORD_COLUMNS: [&str; 14] = [
    "FAC", "TCM", "DCAA", "TCAA", "DCAN", "CC", "pH", "ORP", "toc", "VoW", "newTOC", "Evap", "inW",
    "outW",
];

/// Pool state after one grid step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRow {
    pub step:    u64,
    pub time:    NaiveDateTime,
    pub bathers: u32,
    pub record:  StepRecord,
}

impl StepRow {
    /// The record's values in [`STEP_RECORD_COLUMNS`] order.
    pub fn values(&self) -> [f64; 14] {
        let r = &self.record;
        [
            r.fac, r.tcm, r.dcaa, r.tcaa, r.dcan, r.cc, r.ph, r.orp, r.toc, r.volume, r.new_toc,
            r.evaporation, r.inflow, r.outflow,
        ]
    }
}

/// One calendar date of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySummaryRow {
    pub date:               NaiveDate,
    /// Occupants whose arrival falls on this date.
    pub arrivals:           u32,
    pub water_in_l:         f64,
    pub water_evaporated_l: f64,
    pub water_drained_l:    f64,
    /// µg/L
    pub max_tcm:            f64,
    /// mg
    pub toc_added_mg:       f64,
    pub tcm_exceeded:       bool,
}
