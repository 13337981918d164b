//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `steps.parquet`
//! - `cost_records.parquet`
//! - `daily_summaries.parquet`
//!
//! Times are stored as seconds since the Unix epoch, read as UTC.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder, UInt32Builder,
    UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use pool_sim::CostRecord;

use crate::csv::{COST_COLUMNS, DAILY_COLUMNS};
use crate::row::STEP_RECORD_COLUMNS;
use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{DailySummaryRow, OutputResult, StepRow};

fn step_schema() -> Arc<Schema> {
    let mut fields = vec![
        Field::new("policy",         DataType::Utf8,   false),
        Field::new("step",           DataType::UInt64, false),
        Field::new("unix_time_secs", DataType::Int64,  false),
        Field::new("bathers",        DataType::UInt32, false),
    ];
    fields.extend(STEP_RECORD_COLUMNS.iter().map(|name| Field::new(*name, DataType::Float64, false)));
    Arc::new(Schema::new(fields))
}

fn cost_schema() -> Arc<Schema> {
    Arc::new(Schema::new(
        COST_COLUMNS.iter().map(|name| Field::new(*name, DataType::Float64, false)).collect::<Vec<_>>(),
    ))
}

fn daily_schema() -> Arc<Schema> {
    let types = [
        DataType::Utf8,
        DataType::Utf8,
        DataType::UInt32,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Boolean,
    ];
    Arc::new(Schema::new(
        DAILY_COLUMNS
            .iter()
            .zip(types)
            .map(|(name, ty)| Field::new(*name, ty, false))
            .collect::<Vec<_>>(),
    ))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

fn float_column(values: impl Iterator<Item = f64>) -> ArrayRef {
    let mut b = Float64Builder::new();
    for v in values {
        b.append_value(v);
    }
    Arc::new(b.finish())
}

/// Writes simulation output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    steps:        Option<ArrowWriter<File>>,
    costs:        Option<ArrowWriter<File>>,
    daily:        Option<ArrowWriter<File>>,
    step_schema:  Arc<Schema>,
    cost_schema:  Arc<Schema>,
    daily_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create the three Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let step_schema = step_schema();
        let cost_schema = cost_schema();
        let daily_schema = daily_schema();

        Ok(Self {
            steps: Some(open(dir, "steps.parquet", &step_schema)?),
            costs: Some(open(dir, "cost_records.parquet", &cost_schema)?),
            daily: Some(open(dir, "daily_summaries.parquet", &daily_schema)?),
            step_schema,
            cost_schema,
            daily_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_steps(&mut self, policy: &str, rows: &[StepRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.steps.as_mut() else {
            return Ok(());
        };

        let mut policies = StringBuilder::new();
        let mut steps    = UInt64Builder::new();
        let mut times    = Int64Builder::new();
        let mut bathers  = UInt32Builder::new();
        for row in rows {
            policies.append_value(policy);
            steps.append_value(row.step);
            times.append_value(row.time.and_utc().timestamp());
            bathers.append_value(row.bathers);
        }

        let values: Vec<[f64; 14]> = rows.iter().map(StepRow::values).collect();
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(policies.finish()),
            Arc::new(steps.finish()),
            Arc::new(times.finish()),
            Arc::new(bathers.finish()),
        ];
        columns.extend((0..STEP_RECORD_COLUMNS.len()).map(|c| float_column(values.iter().map(|v| v[c]))));

        let batch = RecordBatch::try_new(Arc::clone(&self.step_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_cost_record(&mut self, record: &CostRecord) -> OutputResult<()> {
        let Some(writer) = self.costs.as_mut() else {
            return Ok(());
        };
        let values = [
            record.cost,
            record.gamma_l,
            record.gamma_m,
            record.gamma_h,
            record.water_use,
            record.health_cost,
            record.improvement,
        ];
        let columns = values.into_iter().map(|v| float_column(std::iter::once(v))).collect();

        let batch = RecordBatch::try_new(Arc::clone(&self.cost_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_daily_summaries(&mut self, policy: &str, rows: &[DailySummaryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.daily.as_mut() else {
            return Ok(());
        };

        let mut policies = StringBuilder::new();
        let mut dates    = StringBuilder::new();
        let mut arrivals = UInt32Builder::new();
        let mut exceeded = BooleanBuilder::new();
        for row in rows {
            policies.append_value(policy);
            dates.append_value(row.date.format("%Y-%m-%d").to_string());
            arrivals.append_value(row.arrivals);
            exceeded.append_value(row.tcm_exceeded);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.daily_schema),
            vec![
                Arc::new(policies.finish()),
                Arc::new(dates.finish()),
                Arc::new(arrivals.finish()),
                float_column(rows.iter().map(|r| r.water_in_l)),
                float_column(rows.iter().map(|r| r.water_evaporated_l)),
                float_column(rows.iter().map(|r| r.water_drained_l)),
                float_column(rows.iter().map(|r| r.max_tcm)),
                float_column(rows.iter().map(|r| r.toc_added_mg)),
                Arc::new(exceeded.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        for slot in [&mut self.steps, &mut self.costs, &mut self.daily] {
            if let Some(w) = slot.take() {
                w.close()?;
            }
        }
        Ok(())
    }
}
