//! Error types for pool-output.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while writing run output or reading cost records back.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Writers do not create their target directory.
    #[error("output directory {} does not exist", .0.display())]
    MissingDir(PathBuf),

    #[error("output I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Also raised when `cost_records.csv` lacks a column or holds a
    /// non-numeric field.
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type OutputResult<T> = Result<T, OutputError>;

pub(crate) fn ensure_dir(dir: &std::path::Path) -> OutputResult<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(OutputError::MissingDir(dir.to_path_buf()))
    }
}
