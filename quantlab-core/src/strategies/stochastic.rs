//! Stochastic oscillator crossover inside the extreme zones.
//!
//! Enter when %K crosses above %D while %K is at or below the oversold level;
//! exit when %K crosses below %D while %K is at or above the overbought level.

use super::fold::{carry_forward, crossed_above, crossed_below};
use crate::domain::BarSeries;
use crate::indicators::{Stochastic, StochasticLine};
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct StochasticOscillator {
    k_period: usize,
    d_period: usize,
    oversold: f64,
    overbought: f64,
    name: String,
}

impl StochasticOscillator {
    pub fn new(k_period: usize, d_period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(k_period >= 1 && d_period >= 1, "stochastic periods must be >= 1");
        assert!(oversold < overbought, "oversold must be < overbought");
        Self {
            k_period,
            d_period,
            oversold,
            overbought,
            name: format!("stochastic_{k_period}_{d_period}"),
        }
    }
}

impl Default for StochasticOscillator {
    fn default() -> Self {
        Self::new(14, 3, 20.0, 80.0)
    }
}

impl Strategy for StochasticOscillator {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let lines =
            Stochastic::new(self.k_period, self.d_period, StochasticLine::K).compute_all(bars.bars());
        let (k, d) = (&lines.k, &lines.d);

        let mut buys = vec![false; bars.len()];
        let mut sells = vec![false; bars.len()];
        let signal = carry_forward(bars.len(), |i| {
            buys[i] = crossed_above(k, d, i) && k[i] <= self.oversold;
            sells[i] = crossed_below(k, d, i) && k[i] >= self.overbought;
            (buys[i], sells[i])
        });

        SignalTable::from_signal(bars.timestamps(), signal)?
            .with_column("k_percent", lines.k)?
            .with_column("d_percent", lines.d)?
            .with_flag_column("buy_signal", &buys)?
            .with_flag_column("sell_signal", &sells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, BarSeries};
    use crate::strategies::test_support::series_from_closes;

    fn tight(closes: &[f64]) -> BarSeries {
        let loose = series_from_closes(closes);
        let bars: Vec<Bar> = loose
            .bars()
            .iter()
            .map(|b| Bar {
                high: b.close,
                low: b.close,
                ..b.clone()
            })
            .collect();
        BarSeries::new(None, bars).unwrap()
    }

    #[test]
    fn oversold_hook_enters_and_overbought_hook_exits() {
        // k window 3, d window 2, bars with high = low = close
        let closes = [100.0, 90.0, 80.0, 70.0, 71.0, 90.0, 100.0, 110.0, 109.0, 100.0];
        let bars = tight(&closes);
        let t = StochasticOscillator::new(3, 2, 20.0, 80.0)
            .generate_signals(&bars)
            .unwrap();
        let k = t.column("k_percent").unwrap();
        let d = t.column("d_percent").unwrap();
        // bar 4: %K 10 crosses above %D 5 in the oversold zone
        assert!((k[4] - 10.0).abs() < 1e-9);
        assert!(k[4] > d[4] && k[3] <= d[3]);
        assert_eq!(t.signal()[4], 1.0);
        // bar 8: %K 90 crosses below %D 95 in the overbought zone
        assert!((k[8] - 90.0).abs() < 1e-9);
        assert_eq!(t.signal()[7], 1.0);
        assert_eq!(t.signal()[8], 0.0);
    }
}
