//! Moving-average crossover: long while the short SMA is above the long SMA.
//!
//! Enter when the short SMA moves above the long SMA, exit when it moves back
//! below. A previous bar still in warmup counts as "not above", so a short
//! SMA that is already above the long SMA when both become defined enters
//! on that bar. Bars where either SMA is undefined carry the current state.

use super::fold::carry_forward;
use crate::domain::BarSeries;
use crate::indicators::{Indicator, Sma};
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct SmaCrossover {
    short_window: usize,
    long_window: usize,
    name: String,
}

impl SmaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        assert!(short_window >= 1, "short window must be >= 1");
        assert!(
            short_window < long_window,
            "short window must be < long window"
        );
        Self {
            short_window,
            long_window,
            name: format!("sma_crossover_{short_window}_{long_window}"),
        }
    }
}

impl Default for SmaCrossover {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let short = Sma::new(self.short_window).compute(bars.bars());
        let long = Sma::new(self.long_window).compute(bars.bars());

        let signal = carry_forward(bars.len(), |i| {
            if short[i].is_nan() || long[i].is_nan() {
                return (false, false);
            }
            let above_now = short[i] > long[i];
            let above_before = short[i - 1] > long[i - 1];
            (above_now && !above_before, !above_now && above_before)
        });

        SignalTable::from_signal(bars.timestamps(), signal)?
            .with_column("sma_short", short)?
            .with_column("sma_long", long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::series_from_closes;

    #[test]
    fn enters_on_cross_and_exits_on_cross_back() {
        // short(2) vs long(3)
        let closes = [10.0, 10.0, 10.0, 12.0, 14.0, 16.0, 10.0, 6.0, 4.0];
        let bars = series_from_closes(&closes);
        let table = SmaCrossover::new(2, 3).generate_signals(&bars).unwrap();
        let s = table.signal();
        // index 2: short 10 == long 10 → not above
        assert_eq!(s[2], 0.0);
        // index 3: short 11 > long 10.67 → enter
        assert_eq!(s[3], 1.0);
        assert_eq!(s[5], 1.0);
        // index 7: short 8 < long 10.67 → exit
        assert_eq!(s[7], 0.0);
        assert!(table.column("sma_short").is_some());
    }

    #[test]
    fn enters_at_warmup_end_when_already_above() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let bars = series_from_closes(&closes);
        let s = SmaCrossover::new(2, 3).generate_signals(&bars).unwrap();
        assert_eq!(s.signal(), &[0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "short window must be < long window")]
    fn rejects_inverted_windows() {
        SmaCrossover::new(50, 20);
    }
}
