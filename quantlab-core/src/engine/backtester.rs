//! Engine handle that keeps the most recent result for reporting.

use super::simulate::run_backtest;
use super::{BacktestError, BacktestResult};
use crate::domain::BarSeries;
use crate::signal::{SignalSource, StrategyParams};

/// Wraps [`run_backtest`] with a last-result cache.
///
/// The cache is a reporting convenience owned by this instance. Every call to
/// [`Backtester::run`] replaces it; a failed run clears it.
#[derive(Debug, Default)]
pub struct Backtester {
    last: Option<BacktestResult>,
}

impl Backtester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(
        &mut self,
        bars: &BarSeries,
        source: SignalSource<'_>,
        initial_capital: f64,
        params: &StrategyParams,
    ) -> Result<&BacktestResult, BacktestError> {
        self.last = None;
        let result = run_backtest(bars, source, initial_capital, params)?;
        Ok(self.last.insert(result))
    }

    pub fn last_result(&self) -> Option<&BacktestResult> {
        self.last.as_ref()
    }

    /// Text summary of the last result, if any.
    pub fn summary(&self) -> Option<String> {
        self.last.as_ref().map(BacktestResult::summary_report)
    }
}
