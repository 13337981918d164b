//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `steps`, `cost_records`, and `daily_summaries`.

use std::path::Path;

use rusqlite::Connection;

use pool_core::TIMESTAMP_FORMAT;
use pool_sim::CostRecord;

use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{DailySummaryRow, OutputResult, StepRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS steps (
                 policy  TEXT    NOT NULL,
                 step    INTEGER NOT NULL,
                 time    TEXT    NOT NULL,
                 bathers INTEGER NOT NULL,
                 fac     REAL NOT NULL,
                 tcm     REAL NOT NULL,
                 dcaa    REAL NOT NULL,
                 tcaa    REAL NOT NULL,
                 dcan    REAL NOT NULL,
                 cc      REAL NOT NULL,
                 ph      REAL NOT NULL,
                 orp     REAL NOT NULL,
                 toc     REAL NOT NULL,
                 volume  REAL NOT NULL,
                 new_toc REAL NOT NULL,
                 evap    REAL NOT NULL,
                 inflow  REAL NOT NULL,
                 outflow REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS cost_records (
                 cost        REAL NOT NULL,
                 gamma_l     REAL NOT NULL,
                 gamma_m     REAL NOT NULL,
                 gamma_h     REAL NOT NULL,
                 water_use   REAL NOT NULL,
                 health_cost REAL NOT NULL,
                 improvement REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS daily_summaries (
                 policy             TEXT    NOT NULL,
                 date               TEXT    NOT NULL,
                 arrivals           INTEGER NOT NULL,
                 water_in_l         REAL    NOT NULL,
                 water_evaporated_l REAL    NOT NULL,
                 water_drained_l    REAL    NOT NULL,
                 max_tcm            REAL    NOT NULL,
                 toc_added_mg       REAL    NOT NULL,
                 tcm_exceeded       INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_steps(&mut self, policy: &str, rows: &[StepRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO steps \
                 (policy, step, time, bathers, fac, tcm, dcaa, tcaa, dcan, cc, ph, orp, \
                  toc, volume, new_toc, evap, inflow, outflow) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            )?;
            for row in rows {
                let r = &row.record;
                stmt.execute(rusqlite::params![
                    policy,
                    row.step as i64,
                    row.time.format(TIMESTAMP_FORMAT).to_string(),
                    row.bathers,
                    r.fac,
                    r.tcm,
                    r.dcaa,
                    r.tcaa,
                    r.dcan,
                    r.cc,
                    r.ph,
                    r.orp,
                    r.toc,
                    r.volume,
                    r.new_toc,
                    r.evaporation,
                    r.inflow,
                    r.outflow,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_cost_record(&mut self, record: &CostRecord) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO cost_records \
             (cost, gamma_l, gamma_m, gamma_h, water_use, health_cost, improvement) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                record.cost,
                record.gamma_l,
                record.gamma_m,
                record.gamma_h,
                record.water_use,
                record.health_cost,
                record.improvement,
            ],
        )?;
        Ok(())
    }

    fn write_daily_summaries(&mut self, policy: &str, rows: &[DailySummaryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO daily_summaries \
                 (policy, date, arrivals, water_in_l, water_evaporated_l, water_drained_l, \
                  max_tcm, toc_added_mg, tcm_exceeded) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    policy,
                    row.date.format("%Y-%m-%d").to_string(),
                    row.arrivals,
                    row.water_in_l,
                    row.water_evaporated_l,
                    row.water_drained_l,
                    row.max_tcm,
                    row.toc_added_mg,
                    row.tcm_exceeded as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
