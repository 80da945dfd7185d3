//! Single-backtest runner: wires strategy construction, data loading and
//! the core engine together.
//!
//! Two entry points:
//! - `run_single()`: pre-loaded series + one strategy spec. Used by the batch driver.
//! - `run_single_backtest()`: loads the symbol first (with synthetic fallback). Used by the CLI.

use thiserror::Error;
use tracing::debug;

use quantlab_core::data::DataProvider;
use quantlab_core::domain::BarSeries;
use quantlab_core::engine::{run_backtest, BacktestError, BacktestResult};
use quantlab_core::signal::{SignalSource, StrategyError, StrategyParams};
use quantlab_core::strategies::StrategySpec;

use crate::config::ConfigError;
use crate::data_loader::{load_series, LoadError, LoadOptions, LoadedSeries};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("invalid strategy: {0}")]
    Strategy(#[from] StrategyError),

    #[error("backtest failed: {0}")]
    Backtest(#[from] BacktestError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build the strategy described by `spec` and backtest it over `series`.
pub fn run_single(
    series: &BarSeries,
    spec: &StrategySpec,
    initial_capital: f64,
) -> Result<BacktestResult, RunError> {
    let strategy = spec.build()?;
    let result = run_backtest(
        series,
        SignalSource::Strategy(strategy.as_ref()),
        initial_capital,
        &StrategyParams::new(),
    )?;
    Ok(result)
}

/// Load `symbol` and backtest one strategy on it.
///
/// Returns the loaded series alongside the result so callers can report
/// whether the bars were synthetic.
pub fn run_single_backtest(
    symbol: &str,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
    spec: &StrategySpec,
    initial_capital: f64,
) -> Result<(BacktestResult, LoadedSeries), RunError> {
    let loaded = load_series(symbol, provider, opts)?;
    debug!(
        symbol,
        bars = loaded.series.len(),
        synthetic = loaded.is_synthetic(),
        "running single backtest"
    );
    let result = run_single(&loaded.series, spec, initial_capital)?;
    Ok((result, loaded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn opts() -> LoadOptions {
        LoadOptions {
            start: NaiveDate::from_ymd_opt(2020, 1, 1),
            end: NaiveDate::from_ymd_opt(2021, 12, 31),
            synthetic: true,
        }
    }

    #[test]
    fn single_backtest_on_synthetic_data() {
        let (result, loaded) =
            run_single_backtest("SPY", None, &opts(), &StrategySpec::BuyAndHold, 10_000.0)
                .unwrap();
        assert!(loaded.is_synthetic());
        assert_eq!(result.symbol.as_deref(), Some("SPY"));
        assert_eq!(result.frame.len(), loaded.series.len());
        assert!((result.total_return - result.benchmark_return).abs() < 1e-9);
    }

    #[test]
    fn invalid_spec_is_rejected_before_running() {
        let (_, loaded) =
            run_single_backtest("SPY", None, &opts(), &StrategySpec::BuyAndHold, 10_000.0)
                .unwrap();
        let spec = StrategySpec::SmaCrossover {
            short_window: 50,
            long_window: 20,
        };
        let err = run_single(&loaded.series, &spec, 10_000.0).unwrap_err();
        assert!(matches!(err, RunError::Strategy(_)));
    }

    #[test]
    fn non_positive_capital_surfaces_backtest_error() {
        let (_, loaded) =
            run_single_backtest("SPY", None, &opts(), &StrategySpec::BuyAndHold, 10_000.0)
                .unwrap();
        let err = run_single(&loaded.series, &StrategySpec::BuyAndHold, 0.0).unwrap_err();
        assert!(matches!(
            err,
            RunError::Backtest(BacktestError::NonPositiveCapital(_))
        ));
    }
}
