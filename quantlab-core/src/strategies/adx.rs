//! ADX trend filter with directional-indicator crossovers.
//!
//! Enter when ADX is above the threshold and +DI crosses above -DI; exit when
//! ADX is above the threshold and -DI crosses above +DI.

use super::fold::{carry_forward, crossed_above};
use crate::domain::BarSeries;
use crate::indicators::{Adx, AdxLine};
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct AdxTrend {
    period: usize,
    threshold: f64,
    name: String,
}

impl AdxTrend {
    pub fn new(period: usize, threshold: f64) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        assert!(
            (0.0..=100.0).contains(&threshold),
            "ADX threshold must be within [0, 100]"
        );
        Self {
            period,
            threshold,
            name: format!("adx_trend_{period}_{threshold}"),
        }
    }
}

impl Default for AdxTrend {
    fn default() -> Self {
        Self::new(14, 25.0)
    }
}

impl Strategy for AdxTrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let lines = Adx::new(self.period, AdxLine::Adx).compute_all(bars.bars());
        let (adx, plus, minus) = (&lines.adx, &lines.plus_di, &lines.minus_di);

        let mut buys = vec![false; bars.len()];
        let mut sells = vec![false; bars.len()];
        let signal = carry_forward(bars.len(), |i| {
            let trending = adx[i] > self.threshold;
            buys[i] = trending && crossed_above(plus, minus, i);
            sells[i] = trending && crossed_above(minus, plus, i);
            (buys[i], sells[i])
        });

        SignalTable::from_signal(bars.timestamps(), signal)?
            .with_column("plus_di", lines.plus_di)?
            .with_column("minus_di", lines.minus_di)?
            .with_column("adx", lines.adx)?
            .with_flag_column("buy_signal", &buys)?
            .with_flag_column("sell_signal", &sells)
    }
}
