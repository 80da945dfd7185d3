//! Exponential Moving Average (EMA) with adjusted weights.
//!
//! alpha = 2 / (span + 1). Each output is the (1 - alpha)^age weighted mean
//! of all closes so far, so the EMA is defined from the first bar and early
//! values lean toward a plain average instead of the seed.

use super::rolling::ewm_mean;
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ewm_mean(&closes(bars), self.span)
    }
}
