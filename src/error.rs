//! Crate-level error type and `Result` alias.

use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read table: {0}")]
    Polars(#[from] PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Column '{column}' not found in {source_name} (available: {available})")]
    MissingColumn {
        column: String,
        source_name: String,
        available: String,
    },

    #[error("No data loaded from {0}")]
    NoData(String),

    #[error("No shuffle run directories found in {0}")]
    NoShuffleRuns(String),

    #[error("No scores left in the null distribution after removing incomplete rows")]
    EmptyDistribution,

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Plot error: {0}")]
    Plot(String),
}

impl Error {
    pub fn plot<E: std::fmt::Display>(e: E) -> Self {
        Error::Plot(e.to_string())
    }
}
