//! Dual rate-of-change momentum.
//!
//! Enter when short-horizon ROC beats long-horizon ROC and is positive; exit
//! when it trails the long ROC and is negative.

use super::fold::carry_forward;
use crate::domain::BarSeries;
use crate::indicators::{Indicator, Roc};
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct Momentum {
    short_window: usize,
    long_window: usize,
    name: String,
}

impl Momentum {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        assert!(short_window >= 1, "short window must be >= 1");
        assert!(
            short_window < long_window,
            "short window must be < long window"
        );
        Self {
            short_window,
            long_window,
            name: format!("momentum_{short_window}_{long_window}"),
        }
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(10, 30)
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let short = Roc::new(self.short_window).compute(bars.bars());
        let long = Roc::new(self.long_window).compute(bars.bars());

        let signal = carry_forward(bars.len(), |i| {
            let enter = short[i] > long[i] && short[i] > 0.0;
            let exit = short[i] < long[i] && short[i] < 0.0;
            (enter, exit)
        });

        SignalTable::from_signal(bars.timestamps(), signal)?
            .with_column("price_change_short", short)?
            .with_column("price_change_long", long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::series_from_closes;

    #[test]
    fn rebound_enters_and_crash_exits() {
        let mut closes = vec![100.0; 6];
        closes.extend([95.0, 96.0, 110.0, 90.0, 80.0]);
        let bars = series_from_closes(&closes);
        let s = Momentum::new(1, 3).generate_signals(&bars).unwrap();
        let sig = s.signal();
        // i=6: both ROCs equal → no action
        assert!(sig[..7].iter().all(|&v| v == 0.0));
        // i=7: roc1 +1.05% beats roc3 -4%
        assert_eq!(sig[7], 1.0);
        assert_eq!(sig[8], 1.0);
        // i=9: roc1 -18% trails roc3 -5.3%
        assert_eq!(sig[9], 0.0);
        // i=10: roc1 > roc3 but negative → stays out
        assert_eq!(sig[10], 0.0);
    }

    #[test]
    fn warmup_is_flat() {
        let bars = series_from_closes(&[1.0, 2.0, 3.0]);
        let s = Momentum::new(2, 5).generate_signals(&bars).unwrap();
        assert!(s.signal().iter().all(|&v| v == 0.0));
    }
}
