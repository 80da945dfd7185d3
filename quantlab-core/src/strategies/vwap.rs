//! Rolling VWAP deviation.
//!
//! deviation = (close - VWAP) / VWAP. Enter when the deviation drops below
//! -threshold; exit when it rises above +threshold. Requires volume.

use super::fold::{carry_forward, fell_through, rose_through};
use crate::domain::BarSeries;
use crate::indicators::{Indicator, Vwap};
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct VwapReversion {
    lookback: usize,
    threshold: f64,
    name: String,
}

impl VwapReversion {
    pub fn new(lookback: usize, threshold: f64) -> Self {
        assert!(lookback >= 1, "VWAP lookback must be >= 1");
        assert!(threshold > 0.0, "VWAP threshold must be > 0");
        Self {
            lookback,
            threshold,
            name: format!("vwap_{lookback}_{threshold}"),
        }
    }
}

impl Default for VwapReversion {
    fn default() -> Self {
        Self::new(20, 0.02)
    }
}

impl Strategy for VwapReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        bars.volumes()?;
        let vwap = Vwap::new(self.lookback).compute(bars.bars());
        let deviation: Vec<f64> = bars
            .closes()
            .iter()
            .zip(vwap.iter())
            .map(|(c, v)| (c - v) / v)
            .collect();

        let signal = carry_forward(bars.len(), |i| {
            (
                fell_through(&deviation, -self.threshold, i),
                rose_through(&deviation, self.threshold, i),
            )
        });

        SignalTable::from_signal(bars.timestamps(), signal)?
            .with_column("vwap", vwap)?
            .with_column("price_deviation", deviation)
    }
}
