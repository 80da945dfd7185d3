//! Bar data I/O: schema validation, CSV/Parquet reading and writing, and
//! local data providers.

pub mod io;
pub mod provider;
pub mod schema;

pub use io::{
    bars_from_dataframe, bars_to_dataframe, canonicalize, read_bars_csv, read_bars_parquet,
    write_bars_csv,
};
pub use provider::{CsvDirectoryProvider, DataProvider};
pub use schema::{BarColumns, BarSchema};

use chrono::NaiveDateTime;
use thiserror::Error;

/// Structured error types for bar data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("bar series is empty")]
    EmptySeries,

    #[error("timestamps must be strictly increasing: {current} follows {previous}")]
    NonIncreasingTimestamp {
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column '{column}' has type {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("invalid timestamp '{value}' at row {row}")]
    InvalidTimestamp { row: usize, value: String },

    #[error("no data for symbol '{symbol}': {reason}")]
    NoData { symbol: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("polars error: {0}")]
    Polars(String),
}

impl From<polars::prelude::PolarsError> for DataError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        DataError::Polars(e.to_string())
    }
}
