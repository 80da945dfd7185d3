//! Bollinger band reversal.
//!
//! Enter when close climbs back above the lower band; exit when close drops
//! back below the upper band.

use super::fold::{carry_forward, crossed_above, crossed_below};
use crate::domain::BarSeries;
use crate::indicators::Bollinger;
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct BollingerBands {
    window: usize,
    num_std: f64,
    name: String,
}

impl BollingerBands {
    pub fn new(window: usize, num_std: f64) -> Self {
        assert!(window >= 2, "Bollinger window must be >= 2");
        assert!(num_std > 0.0, "Bollinger std multiplier must be > 0");
        Self {
            window,
            num_std,
            name: format!("bollinger_{window}_{num_std}"),
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

impl Strategy for BollingerBands {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let bands = Bollinger::middle(self.window, self.num_std).compute_all(bars.bars());
        let close = bars.closes();

        let mut buys = vec![false; bars.len()];
        let mut sells = vec![false; bars.len()];
        let signal = carry_forward(bars.len(), |i| {
            buys[i] = crossed_above(&close, &bands.lower, i);
            sells[i] = crossed_below(&close, &bands.upper, i);
            (buys[i], sells[i])
        });

        SignalTable::from_signal(bars.timestamps(), signal)?
            .with_column("upper_band", bands.upper)?
            .with_column("middle_band", bands.middle)?
            .with_column("lower_band", bands.lower)?
            .with_flag_column("buy_signal", &buys)?
            .with_flag_column("sell_signal", &sells)
    }
}
