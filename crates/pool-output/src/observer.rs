//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use chrono::NaiveDateTime;

use pool_core::TimeGrid;
use pool_models::StepRecord;
use pool_sim::{CostBreakdown, CostRecord, SimObserver};

use crate::row::{DailySummaryRow, StepRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes step rows and search candidates to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Step rows are buffered and written in batches of `batch_size` and at the
/// end of every run.  Cost records are written as they arrive; the writer is
/// finished when a search ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After a run or search returns, check for errors
/// with [`take_error`][Self::take_error] or call [`finish`][Self::finish].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    policy:     String,
    buffer:     Vec<StepRow>,
    batch_size: usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub const DEFAULT_BATCH_SIZE: usize = 1024;

    pub fn new(writer: W) -> Self {
        Self {
            writer,
            policy:     String::new(),
            buffer:     Vec::with_capacity(Self::DEFAULT_BATCH_SIZE),
            batch_size: Self::DEFAULT_BATCH_SIZE,
            last_error: None,
        }
    }

    /// A batch size of 0 is treated as 1.
    pub fn with_batch_size(mut self, rows: usize) -> Self {
        self.batch_size = rows.max(1);
        self
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write a run's daily summaries through the same error channel.
    pub fn write_daily_summaries(&mut self, policy: &str, rows: &[DailySummaryRow]) {
        let result = self.writer.write_daily_summaries(policy, rows);
        self.store_err(result);
    }

    /// Flush buffered rows, finish the writer, and report the first error
    /// seen since the last [`take_error`][Self::take_error].
    pub fn finish(&mut self) -> OutputResult<()> {
        self.flush();
        let result = self.writer.finish();
        self.store_err(result);
        match self.last_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let result = self.writer.write_steps(&self.policy, &self.buffer);
        self.buffer.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::warn!("output error: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_run_start(&mut self, policy: &str, _grid: &TimeGrid) {
        self.flush();
        self.policy = policy.to_owned();
    }

    fn on_step(&mut self, index: usize, time: NaiveDateTime, bathers: u32, record: &StepRecord) {
        self.buffer.push(StepRow { step: index as u64, time, bathers, record: *record });
        if self.buffer.len() >= self.batch_size {
            self.flush();
        }
    }

    fn on_run_end(&mut self, _policy: &str, _cost: &CostBreakdown) {
        self.flush();
    }

    fn on_candidate(&mut self, record: &CostRecord) {
        let result = self.writer.write_cost_record(record);
        self.store_err(result);
    }

    fn on_search_end(&mut self, _best: Option<&CostRecord>) {
        self.flush();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
