//! The backtest pipeline as a pure function.

use tracing::{debug, error, info};

use super::result::{BacktestFrame, BacktestResult};
use super::BacktestError;
use crate::domain::BarSeries;
use crate::metrics::{
    annualized_volatility, compound_curve, drawdown_series, max_drawdown_pct, period_returns,
    sharpe_ratio, win_rate_pct,
};
use crate::signal::{SignalOutput, SignalSource, StrategyParams};

/// Run one backtest.
///
/// `params` is passed to plain signal functions; strategy objects carry their
/// own parameters. Strategy failures are logged and returned unchanged as
/// [`BacktestError::Strategy`].
pub fn run_backtest(
    bars: &BarSeries,
    source: SignalSource<'_>,
    initial_capital: f64,
    params: &StrategyParams,
) -> Result<BacktestResult, BacktestError> {
    if bars.is_empty() {
        return Err(BacktestError::EmptySeries);
    }
    if !(initial_capital > 0.0 && initial_capital.is_finite()) {
        return Err(BacktestError::NonPositiveCapital(initial_capital));
    }

    let output = source.invoke(bars, params).map_err(|e| {
        error!(strategy = source.name(), error = %e, "signal generation failed");
        BacktestError::Strategy(e)
    })?;

    let signal = normalize_signal(bars, output)?;
    let position = realize_positions(&signal);

    let close = bars.closes();
    let returns = period_returns(&close);
    let strategy_returns: Vec<f64> = position
        .iter()
        .zip(returns.iter())
        .map(|(p, r)| p * r)
        .collect();

    let equity_curve = compound_curve(&strategy_returns, initial_capital);
    let benchmark_curve = compound_curve(&returns, initial_capital);
    let (rolling_max, drawdown) = drawdown_series(&equity_curve);

    let total_return = pct_change_from(initial_capital, &equity_curve);
    let benchmark_return = pct_change_from(initial_capital, &benchmark_curve);
    let sharpe = sharpe_ratio(&strategy_returns);

    let result = BacktestResult {
        symbol: bars.symbol().map(str::to_string),
        strategy: source.name().to_string(),
        total_return,
        benchmark_return,
        sharpe_ratio: sharpe,
        max_drawdown: max_drawdown_pct(&drawdown),
        volatility: annualized_volatility(&strategy_returns),
        win_rate: win_rate_pct(&strategy_returns),
        initial_capital,
        frame: BacktestFrame {
            timestamps: bars.timestamps(),
            close,
            signal,
            position,
            returns,
            strategy_returns,
            equity_curve,
            benchmark_curve,
            rolling_max,
            drawdown,
        },
    };

    info!(
        symbol = bars.symbol().unwrap_or("-"),
        strategy = source.name(),
        total_return,
        sharpe,
        "backtest completed"
    );

    Ok(result)
}

/// Reduce any signal output to one value per bar.
///
/// Tables are left-joined by timestamp; bars without a row get 0. Bare
/// sequences must match the bar count. NaN becomes 0 in both cases.
pub fn normalize_signal(bars: &BarSeries, output: SignalOutput) -> Result<Vec<f64>, BacktestError> {
    match output {
        SignalOutput::Table(table) => {
            let timestamps = bars.timestamps();
            let (aligned, unmatched) = table.align_to(&timestamps);
            if unmatched > 0 {
                debug!(unmatched, total = timestamps.len(), "bars without a signal row default to 0");
            }
            Ok(aligned)
        }
        SignalOutput::Sequence(values) => {
            if values.len() != bars.len() {
                return Err(BacktestError::SignalLengthMismatch {
                    expected: bars.len(),
                    actual: values.len(),
                });
            }
            Ok(values
                .into_iter()
                .map(|v| if v.is_nan() { 0.0 } else { v })
                .collect())
        }
    }
}

/// Clamp each signal to [0, 1] and lag it by one bar.
///
/// position[0] = 0 and position[t] = clamp(signal[t - 1]). Negative (short)
/// signals are flattened to 0; values above 1 are capped at 1 (no leverage).
pub fn realize_positions(signal: &[f64]) -> Vec<f64> {
    let mut position = vec![0.0; signal.len()];
    for t in 1..signal.len() {
        position[t] = realize(signal[t - 1]);
    }
    position
}

fn realize(signal: f64) -> f64 {
    if signal.is_nan() || signal <= 0.0 {
        0.0
    } else {
        signal.min(1.0)
    }
}

fn pct_change_from(initial: f64, curve: &[f64]) -> f64 {
    match curve.last() {
        Some(last) => (last / initial - 1.0) * 100.0,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realize_clamps_and_lags() {
        let p = realize_positions(&[1.0, -1.0, 0.5, 2.0, f64::NAN]);
        assert_eq!(p, vec![0.0, 1.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn realize_empty() {
        assert!(realize_positions(&[]).is_empty());
    }
}
