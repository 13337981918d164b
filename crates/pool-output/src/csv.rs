//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `steps.csv`
//! - `cost_records.csv`
//! - `daily_summaries.csv`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{Reader, Writer};

use pool_core::TIMESTAMP_FORMAT;
use pool_sim::CostRecord;

use crate::row::STEP_RECORD_COLUMNS;
use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{DailySummaryRow, OutputResult, StepRow};

pub(crate) const COST_COLUMNS: [&str; 7] =
    ["cost", "gamma_l", "gamma_m", "gamma_h", "water_use", "health_cost", "improvement"];

pub(crate) const DAILY_COLUMNS: [&str; 9] = [
    "policy",
    "date",
    "arrivals",
    "water_in_l",
    "water_evaporated_l",
    "water_drained_l",
    "max_tcm",
    "toc_added_mg",
    "tcm_exceeded",
];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    steps:    Writer<File>,
    costs:    Writer<File>,
    daily:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let mut steps = Writer::from_path(dir.join("steps.csv"))?;
        let header = ["policy", "step", "time", "bathers"].into_iter().chain(STEP_RECORD_COLUMNS);
        steps.write_record(header)?;

        let mut costs = Writer::from_path(dir.join("cost_records.csv"))?;
        costs.write_record(COST_COLUMNS)?;

        let mut daily = Writer::from_path(dir.join("daily_summaries.csv"))?;
        daily.write_record(DAILY_COLUMNS)?;

        Ok(Self { steps, costs, daily, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_steps(&mut self, policy: &str, rows: &[StepRow]) -> OutputResult<()> {
        for row in rows {
            let mut fields = vec![
                policy.to_owned(),
                row.step.to_string(),
                row.time.format(TIMESTAMP_FORMAT).to_string(),
                row.bathers.to_string(),
            ];
            fields.extend(row.values().iter().map(f64::to_string));
            self.steps.write_record(&fields)?;
        }
        Ok(())
    }

    fn write_cost_record(&mut self, record: &CostRecord) -> OutputResult<()> {
        self.costs.write_record(&[
            record.cost.to_string(),
            record.gamma_l.to_string(),
            record.gamma_m.to_string(),
            record.gamma_h.to_string(),
            record.water_use.to_string(),
            record.health_cost.to_string(),
            record.improvement.to_string(),
        ])?;
        Ok(())
    }

    fn write_daily_summaries(&mut self, policy: &str, rows: &[DailySummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.daily.write_record(&[
                policy.to_owned(),
                row.date.format("%Y-%m-%d").to_string(),
                row.arrivals.to_string(),
                row.water_in_l.to_string(),
                row.water_evaporated_l.to_string(),
                row.water_drained_l.to_string(),
                row.max_tcm.to_string(),
                row.toc_added_mg.to_string(),
                (row.tcm_exceeded as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steps.flush()?;
        self.costs.flush()?;
        self.daily.flush()?;
        Ok(())
    }
}

// ── Reading back ──────────────────────────────────────────────────────────────

/// Load a `cost_records.csv` written by [`CsvWriter`].
pub fn load_cost_records_csv(path: &Path) -> OutputResult<Vec<CostRecord>> {
    let file = File::open(path)?;
    load_cost_records_csv_reader(file)
}

/// Like [`load_cost_records_csv`] but reads from any `Read` source.
pub fn load_cost_records_csv_reader<R: Read>(reader: R) -> OutputResult<Vec<CostRecord>> {
    let mut rdr = Reader::from_reader(reader);
    let records = rdr.deserialize().collect::<Result<Vec<CostRecord>, _>>()?;
    log::debug!("loaded {} cost records", records.len());
    Ok(records)
}
