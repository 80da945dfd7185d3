//! Average Directional Index (ADX) with directional indicators.
//!
//! - TR = max(high - low, |high - prev_close|, |low - prev_close|)
//! - +DM = up move when it beats the down move and is positive, else 0
//! - -DM = down move when it beats the up move and is positive, else 0
//! - ±DI = 100 * rolling_sum(±DM) / rolling_sum(TR), 0 when undefined
//! - DX = 100 * |+DI - -DI| / (+DI + -DI), 0 when undefined
//! - ADX = SMA(DX, period)
//!
//! Sums are plain rolling sums rather than Wilder smoothing. The DI lines are
//! zero during warmup; ADX is NaN for its first `period - 1` bars.

use super::rolling::{fill_nan, rolling_mean, rolling_sum};
use super::Indicator;
use crate::domain::Bar;

/// Which ADX line [`Indicator::compute`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxLine {
    Adx,
    PlusDi,
    MinusDi,
}

#[derive(Debug, Clone)]
pub struct AdxLines {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    line: AdxLine,
    name: String,
}

impl Adx {
    pub fn new(period: usize, line: AdxLine) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        let tag = match line {
            AdxLine::Adx => "adx",
            AdxLine::PlusDi => "plus_di",
            AdxLine::MinusDi => "minus_di",
        };
        Self {
            period,
            line,
            name: format!("{tag}_{period}"),
        }
    }

    pub fn compute_all(&self, bars: &[Bar]) -> AdxLines {
        let n = bars.len();
        let mut tr = vec![f64::NAN; n];
        let mut plus_dm = vec![0.0; n];
        let mut minus_dm = vec![0.0; n];

        for i in 0..n {
            let bar = &bars[i];
            let high_low = bar.high - bar.low;
            if i == 0 {
                tr[i] = high_low;
                continue;
            }
            let prev = &bars[i - 1];
            tr[i] = nan_max(&[
                high_low,
                (bar.high - prev.close).abs(),
                (bar.low - prev.close).abs(),
            ]);

            let up = bar.high - prev.high;
            let down = prev.low - bar.low;
            if up > down && up > 0.0 {
                plus_dm[i] = up;
            }
            if down > up && down > 0.0 {
                minus_dm[i] = down;
            }
        }

        let tr_sum = rolling_sum(&tr, self.period);
        let plus_sum = rolling_sum(&plus_dm, self.period);
        let minus_sum = rolling_sum(&minus_dm, self.period);

        let di = |sum: &[f64]| -> Vec<f64> {
            let raw: Vec<f64> = sum
                .iter()
                .zip(tr_sum.iter())
                .map(|(s, t)| if *t == 0.0 { f64::NAN } else { 100.0 * s / t })
                .collect();
            fill_nan(&raw, 0.0)
        };
        let plus_di = di(&plus_sum);
        let minus_di = di(&minus_sum);

        let dx: Vec<f64> = plus_di
            .iter()
            .zip(minus_di.iter())
            .map(|(p, m)| {
                let total = p + m;
                if total == 0.0 || total.is_nan() {
                    0.0
                } else {
                    100.0 * (p - m).abs() / total
                }
            })
            .collect();
        let adx = rolling_mean(&dx, self.period);

        AdxLines {
            adx,
            plus_di,
            minus_di,
        }
    }
}

/// Maximum over the non-NaN values; NaN only if all are NaN.
fn nan_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() { v } else { acc.max(v) })
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            AdxLine::Adx => self.period - 1,
            AdxLine::PlusDi | AdxLine::MinusDi => 0,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let lines = self.compute_all(bars);
        match self.line {
            AdxLine::Adx => lines.adx,
            AdxLine::PlusDi => lines.plus_di,
            AdxLine::MinusDi => lines.minus_di,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn uptrend_has_plus_di_dominant() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + 2.0 * i as f64).collect();
        let bars = make_bars(&closes);
        let lines = Adx::new(14, AdxLine::Adx).compute_all(&bars);
        assert!(lines.plus_di[39] > lines.minus_di[39]);
        assert_approx(lines.minus_di[39], 0.0, DEFAULT_EPSILON);
        // pure uptrend: DX = 100 once DI is defined
        assert_approx(lines.adx[39], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn warmup_shape() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let lines = Adx::new(3, AdxLine::Adx).compute_all(&bars);
        assert!(lines.adx[1].is_nan());
        assert!(!lines.adx[2].is_nan());
        assert_eq!(lines.plus_di[0], 0.0);
        assert_eq!(lines.plus_di[1], 0.0);
    }

    #[test]
    fn first_true_range_is_high_low() {
        let bars = make_bars(&[10.0]);
        let lines = Adx::new(1, AdxLine::PlusDi).compute_all(&bars);
        // no directional movement on the first bar
        assert_eq!(lines.plus_di[0], 0.0);
        assert_eq!(lines.minus_di[0], 0.0);
    }

    #[test]
    fn nan_max_skips_nan() {
        assert_eq!(nan_max(&[f64::NAN, 2.0, 1.0]), 2.0);
        assert!(nan_max(&[f64::NAN]).is_nan());
    }
}
