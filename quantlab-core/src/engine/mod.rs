//! Backtest engine: vectorized single-asset, long-only simulation.
//!
//! One invocation runs the whole pipeline over an in-memory bar series:
//!
//! 1. Invoke the signal source and normalize its output to one signal per bar
//! 2. Realize positions: negative signals become flat (0) and, since there is
//!    no leverage, anything above 1 is capped at 1; then lag by one bar
//! 3. Close-to-close returns and strategy returns
//! 4. Compound equity and benchmark curves, running peak, drawdown
//! 5. Summary metrics

pub mod backtester;
pub mod result;
pub mod simulate;

pub use backtester::Backtester;
pub use result::{BacktestFrame, BacktestResult};
pub use simulate::{normalize_signal, realize_positions, run_backtest};

use thiserror::Error;

use crate::signal::StrategyError;

/// Errors that abort a backtest invocation.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("bar series is empty")]
    EmptySeries,

    #[error("initial capital must be positive and finite, got {0}")]
    NonPositiveCapital(f64),

    #[error("signal sequence has {actual} values but the bar series has {expected}")]
    SignalLengthMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}
