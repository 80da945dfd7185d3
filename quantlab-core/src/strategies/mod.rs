//! Bundled strategies.
//!
//! Every stateful strategy folds per-bar enter/exit conditions into a 0/1
//! signal with one carried state (see `fold`). Crossings need the previous
//! bar, and any comparison against an undefined indicator value is false, so
//! warmup bars keep the current state.

mod fold;

pub mod adx;
pub mod bollinger;
pub mod buy_and_hold;
pub mod dca;
pub mod functions;
pub mod macd;
pub mod mean_reversion;
pub mod momentum;
pub mod rsi;
pub mod sma_crossover;
pub mod spec;
pub mod stochastic;
pub mod vwap;

pub use adx::AdxTrend;
pub use bollinger::BollingerBands;
pub use buy_and_hold::BuyAndHold;
pub use dca::{DcaFrequency, DollarCostAveraging};
pub use functions::{buy_hold_signals, mean_reversion_signals, sma_crossover_signals};
pub use macd::MacdCrossover;
pub use mean_reversion::MeanReversion;
pub use momentum::Momentum;
pub use rsi::RsiReversal;
pub use sma_crossover::SmaCrossover;
pub use spec::StrategySpec;
pub use stochastic::StochasticOscillator;
pub use vwap::VwapReversion;
