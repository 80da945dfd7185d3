//! MACD signal-line crossover.

use super::fold::{carry_forward, crossed_above, crossed_below};
use crate::domain::BarSeries;
use crate::indicators::{Macd, MacdLine};
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct MacdCrossover {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl MacdCrossover {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD spans must be >= 1");
        assert!(fast < slow, "MACD fast span must be < slow span");
        Self {
            fast,
            slow,
            signal,
            name: format!("macd_{fast}_{slow}_{signal}"),
        }
    }
}

impl Default for MacdCrossover {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Strategy for MacdCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let lines =
            Macd::new(self.fast, self.slow, self.signal, MacdLine::Macd).compute_all(bars.bars());

        let signal = carry_forward(bars.len(), |i| {
            (
                crossed_above(&lines.macd, &lines.signal, i),
                crossed_below(&lines.macd, &lines.signal, i),
            )
        });

        SignalTable::from_signal(bars.timestamps(), signal)?
            .with_column("macd", lines.macd)?
            .with_column("signal_line", lines.signal)?
            .with_column("histogram", lines.histogram)
    }
}
