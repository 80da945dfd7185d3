//! Plain signal functions for the function call convention.
//!
//! Each returns a bare signal sequence aligned to the bar series and reads
//! its parameters from [`StrategyParams`].

use crate::domain::BarSeries;
use crate::indicators::rolling::{rolling_mean, rolling_std};
use crate::signal::{SignalOutput, StrategyError, StrategyParams};

/// 1 while the short SMA is above the long SMA, 0 otherwise. The first
/// `short_window` bars are always 0.
///
/// Parameters: `short_window` (20), `long_window` (50).
pub fn sma_crossover_signals(
    bars: &BarSeries,
    params: &StrategyParams,
) -> Result<SignalOutput, StrategyError> {
    let short_window = params.window_or("short_window", 20)?;
    let long_window = params.window_or("long_window", 50)?;
    let close = bars.closes();
    let short = rolling_mean(&close, short_window);
    let long = rolling_mean(&close, long_window);

    let signal = (0..bars.len())
        .map(|i| {
            if i >= short_window && short[i] > long[i] {
                1.0
            } else {
                0.0
            }
        })
        .collect();
    Ok(SignalOutput::Sequence(signal))
}

/// Always 1.
pub fn buy_hold_signals(
    bars: &BarSeries,
    _params: &StrategyParams,
) -> Result<SignalOutput, StrategyError> {
    Ok(SignalOutput::Sequence(vec![1.0; bars.len()]))
}

/// 1 when the z-score is below `-deviation`, -1 when above `deviation`,
/// 0 otherwise. The engine realizes -1 as flat.
///
/// Parameters: `window` (20), `deviation` (1.0).
pub fn mean_reversion_signals(
    bars: &BarSeries,
    params: &StrategyParams,
) -> Result<SignalOutput, StrategyError> {
    let window = params.window_or("window", 20)?;
    let deviation = params.f64_or("deviation", 1.0)?;
    if window < 2 {
        return Err(StrategyError::InvalidParameter {
            name: "window".to_string(),
            reason: "must be >= 2".to_string(),
        });
    }
    let close = bars.closes();
    let mean = rolling_mean(&close, window);
    let std = rolling_std(&close, window);

    let signal = close
        .iter()
        .zip(mean.iter().zip(std.iter()))
        .map(|(c, (m, s))| {
            let z = (c - m) / s;
            if z < -deviation {
                1.0
            } else if z > deviation {
                -1.0
            } else {
                0.0
            }
        })
        .collect();
    Ok(SignalOutput::Sequence(signal))
}
