use pool_core::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OccupancyError {
    /// A required key is missing or a value is unusable.
    #[error("occupancy parameter error: {0}")]
    Config(String),

    #[error("occupancy parameter JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] PoolError),
}

pub type OccupancyResult<T> = Result<T, OccupancyError>;
