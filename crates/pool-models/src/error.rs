use pool_core::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// No evaporation table row lies within tolerance of the room conditions.
    #[error(
        "no evaporation table entry for water {water_temp} °C, air {air_temp} °C, RH {humidity}"
    )]
    NoEvaporationEntry {
        water_temp: f64,
        air_temp:   f64,
        humidity:   f64,
    },

    /// The mixing denominator `V - out - E + in` reached zero or below.
    #[error("mixing volume {volume} L is not positive at step {step}")]
    NonPositiveVolume { step: usize, volume: f64 },

    #[error("{what} length {got} does not match step count {expected}")]
    LengthMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("invalid model parameters: {0}")]
    InvalidParameters(String),

    /// A required key is missing from a parameter file.
    #[error("model parameter error: {0}")]
    Config(String),

    #[error("model parameter JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] PoolError),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Fail with `LengthMismatch` unless `got == expected`.
pub(crate) fn check_len(expected: usize, got: usize, what: &'static str) -> ModelResult<()> {
    if got != expected {
        return Err(ModelError::LengthMismatch { expected, got, what });
    }
    Ok(())
}
