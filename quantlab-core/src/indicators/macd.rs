//! Moving Average Convergence Divergence (MACD).
//!
//! - MACD line: EMA(close, fast) - EMA(close, slow)
//! - Signal line: EMA(MACD line, signal)
//! - Histogram: MACD line - signal line
//!
//! All EMAs use adjusted weights, so every line is defined from the first bar.

use super::rolling::ewm_mean;
use super::{closes, Indicator};
use crate::domain::Bar;

/// Which MACD line [`Indicator::compute`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD spans must be >= 1");
        assert!(fast < slow, "MACD fast span must be < slow span");
        let tag = match line {
            MacdLine::Macd => "line",
            MacdLine::Signal => "signal",
            MacdLine::Histogram => "hist",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("macd_{tag}_{fast}_{slow}_{signal}"),
        }
    }

    pub fn compute_all(&self, bars: &[Bar]) -> MacdLines {
        let close = closes(bars);
        let fast = ewm_mean(&close, self.fast);
        let slow = ewm_mean(&close, self.slow);
        let macd: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
        let signal = ewm_mean(&macd, self.signal);
        let histogram = macd.iter().zip(signal.iter()).map(|(m, s)| m - s).collect();
        MacdLines {
            macd,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let lines = self.compute_all(bars);
        match self.line {
            MacdLine::Macd => lines.macd,
            MacdLine::Signal => lines.signal,
            MacdLine::Histogram => lines.histogram,
        }
    }
}
