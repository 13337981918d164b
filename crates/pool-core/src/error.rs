//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `PoolError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised by the time grid, calendar tables, and random draws.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Date-time text does not match `YYYY/MM/DD hh:mm:ss`.
    #[error("Incorrect data format, should be YYYY/MM/DD hh:mm:ss (got {0:?})")]
    Format(String),

    #[error("invalid time range: {0}")]
    InvalidRange(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand result type for `pool-core`.
pub type PoolResult<T> = Result<T, PoolError>;
