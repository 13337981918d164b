use pool_core::PoolError;
use pool_models::{ControlParameters, ModelError};
use pool_occupancy::OccupancyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match step count {expected}")]
    LengthMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    /// No stored sample lies within `radius` of the query.  Distinct from an
    /// estimate of zero cost.
    #[error("no sampled point within {radius} of {query}")]
    NoDataInRadius {
        query:  ControlParameters,
        radius: f64,
    },

    #[error("control parameters {0} are not strictly increasing")]
    InvalidControl(ControlParameters),

    #[error(transparent)]
    Core(#[from] PoolError),

    #[error(transparent)]
    Occupancy(#[from] OccupancyError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("scenario JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
