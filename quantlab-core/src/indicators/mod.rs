//! Indicators used by the bundled strategies.
//!
//! Indicators are pure functions: bar history in, numeric series out, one
//! value per bar. Warmup positions are `f64::NAN`. Multi-line indicators
//! (MACD, Bollinger, stochastic, ADX) expose a `compute_all` returning every
//! line at once and implement [`Indicator`] for one selected line.
//!
//! # Look-ahead contamination guard
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//! Every indicator must pass the truncated-vs-full series test.

pub mod adx;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;
pub mod zscore;

pub use adx::{Adx, AdxLine, AdxLines};
pub use bollinger::{Bollinger, BollingerBand, BollingerBands};
pub use ema::Ema;
pub use macd::{Macd, MacdLine, MacdLines};
pub use roc::Roc;
pub use rsi::Rsi;
pub use sma::{RollingStd, Sma};
pub use stochastic::{Stochastic, StochasticLine, StochasticLines};
pub use vwap::Vwap;
pub use zscore::ZScore;

use crate::domain::Bar;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. The first `lookback()` values are `f64::NAN` (warmup).
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: Some(1000.0),
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
