//! Rolling z-score of close: (close - SMA) / sample std.
//!
//! A flat window has zero deviation and yields a non-finite score.

use super::rolling::{rolling_mean, rolling_std};
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct ZScore {
    period: usize,
    name: String,
}

impl ZScore {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "z-score period must be >= 2");
        Self {
            period,
            name: format!("zscore_{period}"),
        }
    }
}

impl Indicator for ZScore {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let close = closes(bars);
        let mean = rolling_mean(&close, self.period);
        let std = rolling_std(&close, self.period);
        close
            .iter()
            .zip(mean.iter().zip(std.iter()))
            .map(|(c, (m, s))| (c - m) / s)
            .collect()
    }
}
