//! The `OutputWriter` trait implemented by all backend writers.

use pool_sim::CostRecord;

use crate::{DailySummaryRow, OutputResult, StepRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// [`SimOutputObserver`][crate::SimOutputObserver] stores errors internally;
/// retrieve them with [`take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of per-step rows produced under `policy`.
    fn write_steps(&mut self, policy: &str, rows: &[StepRow]) -> OutputResult<()>;

    /// Write one evaluated search candidate.
    fn write_cost_record(&mut self, record: &CostRecord) -> OutputResult<()>;

    /// Write the per-date summary of one run under `policy`.
    fn write_daily_summaries(&mut self, policy: &str, rows: &[DailySummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
