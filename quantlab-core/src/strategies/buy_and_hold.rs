//! Buy and hold: fully invested on every bar.

use crate::domain::BarSeries;
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone, Copy, Default)]
pub struct BuyAndHold;

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "buy_and_hold"
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let mut positions = vec![0.0; bars.len()];
        if let Some(first) = positions.first_mut() {
            *first = 1.0;
        }
        SignalTable::from_signal(bars.timestamps(), vec![1.0; bars.len()])?
            .with_positions(positions)
    }
}
