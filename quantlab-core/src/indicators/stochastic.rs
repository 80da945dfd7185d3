//! Stochastic oscillator.
//!
//! %K = 100 * (close - lowest low) / (highest high - lowest low) over
//! `k_period` bars, %D = SMA(%K, d_period).
//!
//! A zero high-low range leaves %K undefined at that bar. Undefined %K values
//! are filled forward from the last defined value, never backward, so a bar
//! never borrows a later reading.

use super::rolling::{forward_fill, rolling_max, rolling_mean, rolling_min};
use super::Indicator;
use crate::domain::Bar;

/// Which stochastic line [`Indicator::compute`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct StochasticLines {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize, line: StochasticLine) -> Self {
        assert!(k_period >= 1, "stochastic %K period must be >= 1");
        assert!(d_period >= 1, "stochastic %D period must be >= 1");
        let tag = match line {
            StochasticLine::K => "k",
            StochasticLine::D => "d",
        };
        Self {
            k_period,
            d_period,
            line,
            name: format!("stoch_{tag}_{k_period}_{d_period}"),
        }
    }

    pub fn compute_all(&self, bars: &[Bar]) -> StochasticLines {
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low_min = rolling_min(&lows, self.k_period);
        let high_max = rolling_max(&highs, self.k_period);

        let raw_k: Vec<f64> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let range = high_max[i] - low_min[i];
                if range == 0.0 {
                    f64::NAN
                } else {
                    100.0 * (bar.close - low_min[i]) / range
                }
            })
            .collect();

        let k = forward_fill(&raw_k);
        let d = rolling_mean(&k, self.d_period);
        StochasticLines { k, d }
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            StochasticLine::K => self.k_period - 1,
            StochasticLine::D => self.k_period + self.d_period - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let lines = self.compute_all(bars);
        match self.line {
            StochasticLine::K => lines.k,
            StochasticLine::D => lines.d,
        }
    }
}
