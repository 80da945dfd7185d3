//! Z-score mean reversion, long only.
//!
//! Enter when the close sits `z_entry` standard deviations below its rolling
//! mean; exit once it recovers to `z_exit`. Bars with an undefined z-score
//! carry the current state.

use super::fold::carry_forward;
use crate::domain::BarSeries;
use crate::indicators::{Indicator, RollingStd, Sma, ZScore};
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct MeanReversion {
    window: usize,
    z_entry: f64,
    z_exit: f64,
    name: String,
}

impl MeanReversion {
    pub fn new(window: usize, z_entry: f64, z_exit: f64) -> Self {
        assert!(window >= 2, "z-score window must be >= 2");
        assert!(z_entry < z_exit, "z_entry must be < z_exit");
        Self {
            window,
            z_entry,
            z_exit,
            name: format!("mean_reversion_{window}"),
        }
    }
}

impl Default for MeanReversion {
    fn default() -> Self {
        Self::new(20, -1.0, -0.1)
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let sma = Sma::new(self.window).compute(bars.bars());
        let std = RollingStd::new(self.window).compute(bars.bars());
        let z = ZScore::new(self.window).compute(bars.bars());

        let signal = carry_forward(bars.len(), |i| (z[i] <= self.z_entry, z[i] >= self.z_exit));

        SignalTable::from_signal(bars.timestamps(), signal)?
            .with_column("sma", sma)?
            .with_column("std", std)?
            .with_column("zscore", z)
    }
}
