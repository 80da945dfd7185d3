//! Relative Strength Index (RSI), simple-average form.
//!
//! gain/loss are the positive/negative parts of the close-to-close change,
//! averaged with a plain rolling mean over `period`. The first change is
//! undefined and counts as zero gain and zero loss.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! A window with no losses has RS = inf and RSI = 100. A window with no
//! movement at all (0 / 0) is treated as RS = 0, RSI = 0.
//! Lookback: period - 1.

use super::rolling::{diff, rolling_mean};
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let delta = diff(&closes(bars));
        let gains: Vec<f64> = delta.iter().map(|&d| if d > 0.0 { d } else { 0.0 }).collect();
        let losses: Vec<f64> = delta.iter().map(|&d| if d < 0.0 { -d } else { 0.0 }).collect();

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .iter()
            .zip(avg_loss.iter())
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    return f64::NAN;
                }
                let mut rs = g / l;
                if rs.is_nan() {
                    rs = 0.0;
                }
                100.0 - 100.0 / (1.0 + rs)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rsi_all_gains_is_100() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[1].is_nan());
        assert_approx(result[2], 100.0, DEFAULT_EPSILON);
        assert_approx(result[4], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let bars = make_bars(&[5.0, 4.0, 3.0, 2.0]);
        let result = Rsi::new(2).compute(&bars);
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_flat_is_0() {
        let bars = make_bars(&[5.0; 5]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[4], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_balanced_is_50() {
        // changes +1, -1 → avg gain 0.5, avg loss 0.5
        let bars = make_bars(&[10.0, 11.0, 10.0]);
        let result = Rsi::new(2).compute(&bars);
        assert_approx(result[2], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_bounded() {
        let bars = make_bars(&[10.0, 12.0, 9.0, 15.0, 14.0, 13.5, 16.0, 11.0]);
        for v in Rsi::new(3).compute(&bars).into_iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v), "RSI out of range: {v}");
        }
    }
}
