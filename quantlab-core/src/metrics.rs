//! Performance metrics: pure functions over per-bar return and equity series.
//!
//! NaN samples are skipped by every statistic. Percent-valued metrics are
//! returned already multiplied by 100.

use serde::{Deserialize, Serialize};

/// Annualization factor for per-bar statistics.
///
/// Applied regardless of bar interval, so intraday or weekly series are
/// annualized as if each bar were one trading day.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Standard deviations below this are treated as zero.
const STD_EPSILON: f64 = 1e-12;

fn valid(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1). NaN for fewer than two samples.
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mean = mean_f64(values);
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Annualized Sharpe ratio with a zero risk-free rate.
///
/// Sharpe = mean / std * sqrt(252). Returns 0.0 when fewer than two valid
/// samples exist or the deviation is zero.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let samples = valid(returns);
    let std = std_dev(&samples);
    if std.is_nan() || std < STD_EPSILON {
        return 0.0;
    }
    mean_f64(&samples) / std * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Annualized volatility in percent: std * sqrt(252) * 100.
///
/// Returns 0.0 when fewer than two valid samples exist.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    let std = std_dev(&valid(returns));
    if std.is_nan() || std < STD_EPSILON {
        return 0.0;
    }
    std * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// Share of winning bars among bars that moved, in percent.
///
/// Zero returns count as neither. Returns 0.0 if nothing moved.
pub fn win_rate_pct(returns: &[f64]) -> f64 {
    let wins = returns.iter().filter(|&&r| r > 0.0).count();
    let losses = returns.iter().filter(|&&r| r < 0.0).count();
    if wins + losses == 0 {
        return 0.0;
    }
    wins as f64 / (wins + losses) as f64 * 100.0
}

/// Compound `returns` onto `initial`.
///
/// The first element is always `initial`; the first return is never applied.
/// A NaN return gives NaN at that bar while compounding continues from the
/// last defined value.
pub fn compound_curve(returns: &[f64], initial: f64) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len());
    let mut level = initial;
    for (i, &r) in returns.iter().enumerate() {
        if i == 0 {
            curve.push(initial);
        } else if r.is_nan() {
            curve.push(f64::NAN);
        } else {
            level *= 1.0 + r;
            curve.push(level);
        }
    }
    curve
}

/// Running peak and fractional drawdown from it.
///
/// The peak skips NaN; drawdown is NaN wherever the curve is.
pub fn drawdown_series(curve: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut rolling_max = Vec::with_capacity(curve.len());
    let mut drawdown = Vec::with_capacity(curve.len());
    let mut peak = f64::NAN;
    for &v in curve {
        if !v.is_nan() && (peak.is_nan() || v > peak) {
            peak = v;
        }
        rolling_max.push(peak);
        drawdown.push((v - peak) / peak);
    }
    (rolling_max, drawdown)
}

/// Deepest drawdown in percent (≤ 0). Returns 0.0 if no drawdown is defined.
pub fn max_drawdown_pct(drawdown: &[f64]) -> f64 {
    let deepest = drawdown
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::INFINITY, f64::min);
    if deepest.is_infinite() {
        return 0.0;
    }
    deepest * 100.0
}

/// Bar-over-bar percent change of a curve; NaN at index 0.
pub fn period_returns(curve: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; curve.len()];
    for i in 1..curve.len() {
        out[i] = curve[i] / curve[i - 1] - 1.0;
    }
    out
}

/// Metrics for an arbitrary per-period return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub total_return: f64,
    pub annual_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
}

impl PeriodMetrics {
    /// Compute metrics from a per-period return series.
    ///
    /// NaN entries are dropped first. The drawdown is measured on a unit
    /// curve that starts at 1.0 before the first return, so a loss on the
    /// first period already counts. Win rate is positive periods over all
    /// valid periods.
    pub fn from_returns(returns: &[f64]) -> Self {
        let samples = valid(returns);
        if samples.is_empty() {
            return Self {
                total_return: 0.0,
                annual_return: 0.0,
                volatility: 0.0,
                sharpe_ratio: 0.0,
                max_drawdown: 0.0,
                win_rate: 0.0,
            };
        }

        let growth: f64 = samples.iter().map(|r| 1.0 + r).product();

        let mut curve = Vec::with_capacity(samples.len() + 1);
        curve.push(1.0);
        let mut level = 1.0;
        for r in &samples {
            level *= 1.0 + r;
            curve.push(level);
        }
        let (_, drawdown) = drawdown_series(&curve);

        let positive = samples.iter().filter(|&&r| r > 0.0).count();

        Self {
            total_return: (growth - 1.0) * 100.0,
            annual_return: mean_f64(&samples) * TRADING_DAYS_PER_YEAR * 100.0,
            volatility: annualized_volatility(&samples),
            sharpe_ratio: sharpe_ratio(&samples),
            max_drawdown: max_drawdown_pct(&drawdown),
            win_rate: positive as f64 / samples.len() as f64 * 100.0,
        }
    }
}
