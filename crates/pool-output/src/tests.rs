//! Integration tests for pool-output.

use chrono::{NaiveDate, NaiveDateTime};

use pool_models::{ControlParameters, StepRecord};
use pool_sim::{CostBreakdown, CostRecord};

use crate::{DailySummaryRow, StepRow};

fn ts(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 6, day).unwrap().and_hms_opt(h, m, 0).unwrap()
}

fn step_row(step: u64, tcm: f64) -> StepRow {
    StepRow {
        step,
        time:    ts(1, 0, 0) + chrono::Duration::seconds(step as i64 * 360),
        bathers: step as u32,
        record:  StepRecord { tcm, volume: 200_000.0, inflow: 4.0, ..StepRecord::default() },
    }
}

fn cost_record(h: f64, total: f64, improvement: f64) -> CostRecord {
    CostRecord::new(
        ControlParameters::new(4.0, 20.0, h),
        CostBreakdown { water_m3: total - 1.0, health: 10.0, total },
        improvement,
    )
}

fn daily_row(day: u32) -> DailySummaryRow {
    DailySummaryRow {
        date:               NaiveDate::from_ymd_opt(2022, 6, day).unwrap(),
        arrivals:           12,
        water_in_l:         100.0,
        water_evaporated_l: 40.0,
        water_drained_l:    60.0,
        max_tcm:            35.5,
        toc_added_mg:       2.5,
        tcm_exceeded:       false,
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::CsvWriter;
    use crate::load_cost_records_csv;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("steps.csv").exists());
        assert!(dir.path().join("cost_records.csv").exists());
        assert!(dir.path().join("daily_summaries.csv").exists());
    }

    #[test]
    fn csv_missing_dir_is_reported() {
        let dir = tmp();
        let missing = dir.path().join("not-there");
        let err = CsvWriter::new(&missing).err().expect("missing dir rejected");
        assert!(matches!(err, crate::OutputError::MissingDir(ref p) if *p == missing));
    }

    #[test]
    fn csv_step_headers_and_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_steps("fixed-rate", &[step_row(0, 1.5), step_row(1, 2.5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(&headers[..6], ["policy", "step", "time", "bathers", "FAC", "TCM"]);
        assert_eq!(headers.len(), 18);

        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "fixed-rate");
        assert_eq!(&rows[1][1], "1");
        assert_eq!(&rows[1][2], "2022/06/01 00:06:00");
        assert_eq!(&rows[1][5], "2.5"); // TCM
    }

    #[test]
    fn cost_records_reload() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let written = [cost_record(100.0, 5.0, 0.0), cost_record(110.0, 4.25, 0.75)];
        for r in &written {
            w.write_cost_record(r).unwrap();
        }
        w.finish().unwrap();

        let loaded = load_cost_records_csv(&dir.path().join("cost_records.csv")).unwrap();
        assert_eq!(loaded, written);
    }

    #[test]
    fn daily_summary_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_daily_summaries("occupancy-threshold", &[daily_row(1), daily_row(2)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("daily_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "2022-06-01");
        assert_eq!(&rows[0][2], "12");
        assert_eq!(&rows[1][8], "0");
    }

    #[test]
    fn missing_cost_column_is_an_error() {
        let text = "cost,gamma_l,gamma_m\n1,2,3\n";
        assert!(crate::load_cost_records_csv_reader(text.as_bytes()).is_err());
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_steps("fixed-rate", &[]).unwrap();
        w.write_daily_summaries("fixed-rate", &[]).unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use pool_core::{OccupantId, TimeGrid};
    use pool_models::{ByproductParameters, ChemicalParameters, FixedRate};
    use pool_occupancy::{BodySize, Gender, Occupant};
    use pool_sim::{GridSearch, ScenarioConfig, SimBuilder, SimObserver};

    use super::*;
    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;
    use crate::{load_cost_records_csv, OutputResult, SimOutputObserver};

    /// Counts what reaches the writer.
    #[derive(Default)]
    struct Recording {
        step_batches: Vec<(String, usize)>,
        costs:        usize,
        finished:     usize,
    }

    impl OutputWriter for Recording {
        fn write_steps(&mut self, policy: &str, rows: &[StepRow]) -> OutputResult<()> {
            self.step_batches.push((policy.to_owned(), rows.len()));
            Ok(())
        }
        fn write_cost_record(&mut self, _record: &CostRecord) -> OutputResult<()> {
            self.costs += 1;
            Ok(())
        }
        fn write_daily_summaries(&mut self, _p: &str, _rows: &[DailySummaryRow]) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn chem_params() -> ChemicalParameters {
        let common = ByproductParameters {
            activation_energy: 22_300.0,
            pre_exponential:   612.0,
            m:                 0.002,
            n:                 -0.4,
            molar_mass:        119.38,
        };
        ChemicalParameters { gas_constant: 8.3145, bf_to_toc_ratio_mg: 400.0, byproducts: [common; 4] }
    }

    fn one_day_sim() -> pool_sim::Sim {
        let config = ScenarioConfig {
            start: "2022/06/01 00:00:00".into(),
            end: "2022/06/02 00:00:00".into(),
            ..ScenarioConfig::default()
        };
        let body = BodySize { height_cm: 170.0, weight_kg: 65.0 };
        let swimmer =
            Occupant::new(OccupantId(0), ts(1, 9, 0), 3600, Gender::Male, 40, body, vec![50.0; 10]);
        SimBuilder::new(config, chem_params()).occupants(vec![swimmer]).build().unwrap()
    }

    #[test]
    fn steps_are_batched_and_flushed_at_run_end() {
        let grid = TimeGrid::new(ts(1, 0, 0), ts(1, 1, 0), 360).unwrap();
        let mut obs = SimOutputObserver::new(Recording::default()).with_batch_size(4);

        obs.on_run_start("fixed-rate", &grid);
        for (i, t) in grid.iter().enumerate() {
            obs.on_step(i, t, 0, &StepRecord::default());
        }
        obs.on_run_end("fixed-rate", &CostBreakdown::default());

        let w = obs.into_writer();
        let sizes: Vec<usize> = w.step_batches.iter().map(|(_, n)| *n).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert!(w.step_batches.iter().all(|(p, _)| p == "fixed-rate"));
        assert_eq!(w.finished, 0);
    }

    #[test]
    fn search_end_finishes_the_writer() {
        let mut obs = SimOutputObserver::new(Recording::default());
        obs.on_candidate(&cost_record(100.0, 1.0, 0.0));
        obs.on_candidate(&cost_record(110.0, 2.0, -1.0));
        obs.on_search_end(None);
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        assert_eq!(w.costs, 2);
        assert_eq!(w.finished, 1);
    }

    #[test]
    fn run_writes_every_step_to_csv() {
        let sim = one_day_sim();
        let dir = tempfile::tempdir().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&FixedRate::default(), &mut obs).unwrap();
        obs.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        assert_eq!(rdr.records().count(), sim.grid.len());
    }

    #[test]
    fn search_records_reload_in_order() {
        let sim = one_day_sim();
        let dir = tempfile::tempdir().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        let search = GridSearch {
            gamma_l:        vec![4.0],
            gamma_m:        vec![20.0, 40.0],
            gamma_h:        vec![100.0],
            plateau_window: 5,
        };
        let outcome = search.run(&sim, &mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let loaded = load_cost_records_csv(&dir.path().join("cost_records.csv")).unwrap();
        assert_eq!(loaded, outcome.history);
    }
}

// ── Daily summaries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod summary_tests {
    use approx::assert_relative_eq;
    use pool_core::{OccupantId, TimeGrid};
    use pool_occupancy::{BodySize, Gender, Occupant};

    use super::*;
    use crate::daily_summaries;

    #[test]
    fn two_days_reduce_to_two_rows() {
        // 12-hour steps: two per day.
        let grid = TimeGrid::new(ts(1, 0, 0), ts(3, 0, 0), 43_200).unwrap();
        let body = BodySize { height_cm: 170.0, weight_kg: 65.0 };
        let occupants = vec![
            Occupant::new(OccupantId(0), ts(1, 9, 0), 3600, Gender::Male, 40, body, vec![50.0]),
            Occupant::new(OccupantId(1), ts(2, 9, 0), 3600, Gender::Male, 40, body, vec![50.0]),
            Occupant::new(OccupantId(2), ts(2, 18, 0), 3600, Gender::Female, 20, body, vec![50.0]),
        ];
        let tcm = [10.0, 150.0, 20.0, 30.0];
        let records: Vec<StepRecord> = tcm
            .iter()
            .map(|&tcm| StepRecord { tcm, inflow: 5.0, outflow: 3.0, evaporation: 1.0, new_toc: 0.5, ..StepRecord::default() })
            .collect();

        let summary = daily_summaries(&grid, &occupants, &records, 100.0);
        assert_eq!(summary.days.len(), 2);
        assert_relative_eq!(summary.max_tcm, 150.0);
        assert_eq!(summary.exceeded_days(), 1);

        let d1 = summary.days[0];
        assert_eq!(d1.date, NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        assert_eq!(d1.arrivals, 1);
        assert_relative_eq!(d1.water_in_l, 10.0);
        assert_relative_eq!(d1.water_drained_l, 6.0);
        assert_relative_eq!(d1.water_evaporated_l, 2.0);
        assert_relative_eq!(d1.toc_added_mg, 1.0);
        assert!(d1.tcm_exceeded);

        let d2 = summary.days[1];
        assert_eq!(d2.arrivals, 2);
        assert_relative_eq!(d2.max_tcm, 30.0);
        assert!(!d2.tcm_exceeded);
    }

    #[test]
    fn empty_run_has_no_peak() {
        let grid = TimeGrid::new(ts(1, 0, 0), ts(2, 0, 0), 360).unwrap();
        let summary = daily_summaries(&grid, &[], &[], 100.0);
        assert_eq!(summary.days.len(), 1);
        assert_eq!(summary.max_tcm, 0.0);
        assert_eq!(summary.days[0].water_in_l, 0.0);
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_step_count_and_policy() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_steps("fixed-rate", &[step_row(0, 1.0), step_row(1, 2.0), step_row(2, 3.0)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (count, max_tcm): (i64, f64) = conn
            .query_row("SELECT COUNT(*), MAX(tcm) FROM steps WHERE policy = 'fixed-rate'", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(max_tcm, 3.0);
    }

    #[test]
    fn sqlite_cost_record() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_cost_record(&cost_record(120.0, 7.5, 0.25)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (cost, h): (f64, f64) = conn
            .query_row("SELECT cost, gamma_h FROM cost_records", [], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap();
        assert_eq!(cost, 7.5);
        assert_eq!(h, 120.0);
    }

    #[test]
    fn sqlite_exceeded_as_integer() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let row = DailySummaryRow { tcm_exceeded: true, ..daily_row(1) };
        w.write_daily_summaries("fixed-rate", &[row]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let val: i64 = conn
            .query_row("SELECT tcm_exceeded FROM daily_summaries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(val, 1);
    }
}

// ── Parquet ───────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("steps.parquet").exists());
        assert!(dir.path().join("cost_records.parquet").exists());
        assert!(dir.path().join("daily_summaries.parquet").exists());
    }

    #[test]
    fn parquet_step_round_trip() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_steps("fixed-rate", &[step_row(0, 1.0), step_row(1, 2.0)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("steps.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let reader = builder.build().unwrap();

        let total_rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);
        assert_eq!(*schema.field_with_name("TCM").unwrap().data_type(), DataType::Float64);
        assert_eq!(*schema.field_with_name("policy").unwrap().data_type(), DataType::Utf8);
    }

    #[test]
    fn parquet_cost_records_one_batch_each() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_cost_record(&cost_record(100.0, 1.0, 0.0)).unwrap();
        w.write_cost_record(&cost_record(110.0, 2.0, -1.0)).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("cost_records.parquet")).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file).unwrap().build().unwrap();
        let total_rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);
    }

    #[test]
    fn parquet_finish_required() {
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_steps("fixed-rate", &[step_row(0, 1.0)]).unwrap();
            // Dropped without finish(): no footer.
        }

        let file = std::fs::File::open(dir.path().join("steps.parquet")).unwrap();
        assert!(ParquetRecordBatchReaderBuilder::try_new(file).is_err());
    }
}
