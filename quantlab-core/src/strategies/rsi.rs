//! RSI threshold reversal.
//!
//! Enter when RSI rises back above the oversold level; exit when it falls
//! back below the overbought level.

use super::fold::{carry_forward, fell_through, rose_through};
use crate::domain::BarSeries;
use crate::indicators::{Indicator, Rsi};
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct RsiReversal {
    period: usize,
    oversold: f64,
    overbought: f64,
    name: String,
}

impl RsiReversal {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        assert!(
            (0.0..=100.0).contains(&oversold) && (0.0..=100.0).contains(&overbought),
            "RSI levels must be within [0, 100]"
        );
        assert!(oversold < overbought, "oversold must be < overbought");
        Self {
            period,
            oversold,
            overbought,
            name: format!("rsi_{period}_{oversold}_{overbought}"),
        }
    }
}

impl Default for RsiReversal {
    fn default() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl Strategy for RsiReversal {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let rsi = Rsi::new(self.period).compute(bars.bars());

        let signal = carry_forward(bars.len(), |i| {
            (
                rose_through(&rsi, self.oversold, i),
                fell_through(&rsi, self.overbought, i),
            )
        });

        SignalTable::from_signal(bars.timestamps(), signal)?.with_column("rsi", rsi)
    }
}
