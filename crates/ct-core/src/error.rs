//! Error types for the CTRUE analysis core.
//!
//! Nothing here is fatal to an analysis pass: a run missing from the good-run
//! table is reported as `Option::None` by the lookup itself, while the
//! variants below cover invalid configuration input and the two recoverable
//! sentinels of the estimation step (`Undefined`, `InsufficientData`).

use thiserror::Error;

/// CTRUE analysis error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A statistic has no defined value (e.g. binomial error of an empty bucket).
    #[error("Undefined statistic: {0}")]
    Undefined(String),

    /// Too few data points to constrain the requested fit.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
