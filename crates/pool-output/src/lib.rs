//! `pool-output` — output writers for the pool water-management simulator.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                  |
//! |-----------|---------|----------------------------------------------------------------|
//! | *(none)*  | CSV     | `steps.csv`, `cost_records.csv`, `daily_summaries.csv`         |
//! | `sqlite`  | SQLite  | `output.db`                                                    |
//! | `parquet` | Parquet | `steps.parquet`, `cost_records.parquet`, `daily_summaries.parquet` |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `pool_sim::SimObserver`.
//! [`daily_summaries`] reduces one run to per-date rows, and
//! [`load_cost_records_csv`] reads a `cost_records.csv` back for the
//! surrogate.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pool_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! let eval = sim.run(&policy, &mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod summary;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::{load_cost_records_csv, load_cost_records_csv_reader, CsvWriter};
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{DailySummaryRow, StepRow};
pub use summary::{daily_summaries, RunSummary};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
