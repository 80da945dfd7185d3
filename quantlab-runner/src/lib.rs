//! QuantLab Runner: configuration, data loading, batch orchestration, reporting.
//!
//! This crate builds on `quantlab-core` to provide:
//! - TOML run configuration with validation and a BLAKE3 run id
//! - Data loading from a provider with seeded synthetic fallback
//! - Single-backtest and batch (symbol × period × strategy) drivers
//! - Comparison and consistency tables, CSV and JSON export

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod report;
pub mod runner;

pub use batch::{
    run_batch, split_periods, BatchFailure, BatchOutcome, BatchRecord, Period, PeriodSplit,
};
pub use config::{ConfigError, RunConfig, RunId, DEFAULT_INITIAL_CAPITAL};
pub use data_loader::{
    generate_synthetic_series, load_series, DataOrigin, LoadError, LoadOptions, LoadedSeries,
};
pub use report::{ConsistencyRow, PeriodSummary};
pub use runner::{run_single, run_single_backtest, RunError};
