//! QuantLab Core: bar series, signal interface, indicators, strategies,
//! backtest engine and metrics.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, bar series)
//! - The signal contract strategies satisfy (tables, bare sequences, functions)
//! - Indicators and the bundled rule-based strategies
//! - The vectorized long-only engine with its one-bar position lag
//! - Metric derivation shared by the engine and standalone return streams
//! - Bar table I/O through polars

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod metrics;
pub mod signal;
pub mod strategies;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed to batch worker threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::BarSeries>();
        require_sync::<domain::BarSeries>();

        // Signal types
        require_send::<signal::SignalTable>();
        require_sync::<signal::SignalTable>();
        require_send::<signal::SignalOutput>();
        require_sync::<signal::SignalOutput>();
        require_send::<signal::StrategyParams>();
        require_sync::<signal::StrategyParams>();
        require_send::<strategies::StrategySpec>();
        require_sync::<strategies::StrategySpec>();
        require_send::<Box<dyn signal::Strategy>>();
        require_sync::<Box<dyn signal::Strategy>>();

        // Engine types
        require_send::<engine::BacktestResult>();
        require_sync::<engine::BacktestResult>();
        require_send::<engine::Backtester>();
        require_sync::<engine::Backtester>();
        require_send::<metrics::PeriodMetrics>();
        require_sync::<metrics::PeriodMetrics>();

        // Data
        require_send::<data::CsvDirectoryProvider>();
        require_sync::<data::CsvDirectoryProvider>();
    }

    /// Architecture contract: strategies see bars only.
    ///
    /// `generate_signals` takes the bar series and nothing else, so a
    /// strategy cannot observe positions or equity. If this stops compiling,
    /// the contract changed.
    #[test]
    fn strategy_trait_sees_only_bars() {
        fn _check_trait_object_builds(
            strategy: &dyn signal::Strategy,
            bars: &domain::BarSeries,
        ) -> Result<signal::SignalTable, signal::StrategyError> {
            strategy.generate_signals(bars)
        }
    }
}
