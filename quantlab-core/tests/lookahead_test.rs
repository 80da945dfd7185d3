//! Look-ahead contamination tests for indicators and strategies.
//!
//! Invariant: no value at bar t may depend on price data from bar t+1 or
//! later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs.
//!
//! Dollar-cost averaging is excluded: its step size is one over the number
//! of calendar periods in the whole series.

use chrono::NaiveDate;
use quantlab_core::domain::{Bar, BarSeries};
use quantlab_core::indicators::{
    Adx, AdxLine, Bollinger, Ema, Indicator, Macd, MacdLine, Roc, RollingStd, Rsi, Sma,
    Stochastic, StochasticLine, Vwap, ZScore,
};
use quantlab_core::signal::Strategy;
use quantlab_core::strategies::{
    AdxTrend, BollingerBands as BollingerStrategy, BuyAndHold, MacdCrossover, MeanReversion,
    Momentum, RsiReversal, SmaCrossover, StochasticOscillator, VwapReversion,
};

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price += change;
        price = price.max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        bars.push(Bar {
            timestamp: base + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: Some(1000.0 + i as f64 * 100.0),
        });
    }
    bars
}

fn assert_same_prefix(name: &str, truncated: &[f64], full: &[f64]) {
    for (i, (&t, &f)) in truncated.iter().zip(full.iter()).enumerate() {
        if t.is_nan() && f.is_nan() {
            continue;
        }
        assert!(
            !t.is_nan() && !f.is_nan(),
            "{name}: NaN mismatch at bar {i} (truncated={t}, full={f})"
        );
        assert!(
            (t - f).abs() < 1e-10,
            "{name}: look-ahead contamination at bar {i}: truncated={t}, full={f}"
        );
    }
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let full = indicator.compute(full_bars);
    let truncated = indicator.compute(&full_bars[..truncated_len]);
    assert_eq!(truncated.len(), truncated_len, "{}: length", indicator.name());
    assert_eq!(full.len(), full_bars.len(), "{}: length", indicator.name());
    assert_same_prefix(indicator.name(), &truncated, &full);
}

fn assert_strategy_no_lookahead(strategy: &dyn Strategy, full_bars: &[Bar], truncated_len: usize) {
    let full = BarSeries::new(None, full_bars.to_vec()).unwrap();
    let truncated = BarSeries::new(None, full_bars[..truncated_len].to_vec()).unwrap();
    let full_table = strategy.generate_signals(&full).unwrap();
    let truncated_table = strategy.generate_signals(&truncated).unwrap();
    assert_eq!(truncated_table.len(), truncated_len);
    assert_same_prefix(strategy.name(), truncated_table.signal(), full_table.signal());
    for column in truncated_table.column_names() {
        let label = format!("{}:{column}", strategy.name());
        assert_same_prefix(
            &label,
            truncated_table.column(column).unwrap(),
            full_table.column(column).unwrap(),
        );
    }
}

// ── Indicators ───────────────────────────────────────────────────────

#[test]
fn lookahead_sma_and_std() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Sma::new(10), &bars, 100);
    assert_no_lookahead(&Sma::new(50), &bars, 100);
    assert_no_lookahead(&RollingStd::new(20), &bars, 100);
}

#[test]
fn lookahead_ema() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Ema::new(12), &bars, 100);
    assert_no_lookahead(&Ema::new(26), &bars, 100);
}

#[test]
fn lookahead_roc() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Roc::new(10), &bars, 100);
    assert_no_lookahead(&Roc::new(30), &bars, 100);
}

#[test]
fn lookahead_zscore() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&ZScore::new(20), &bars, 100);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
    assert_no_lookahead(&Rsi::new(7), &bars, 100);
}

#[test]
fn lookahead_macd() {
    let bars = make_test_bars(200);
    for line in [MacdLine::Macd, MacdLine::Signal, MacdLine::Histogram] {
        assert_no_lookahead(&Macd::new(12, 26, 9, line), &bars, 100);
    }
}

#[test]
fn lookahead_bollinger() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Bollinger::upper(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::middle(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::lower(20, 2.0), &bars, 100);
}

#[test]
fn lookahead_stochastic() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Stochastic::new(14, 3, StochasticLine::K), &bars, 100);
    assert_no_lookahead(&Stochastic::new(14, 3, StochasticLine::D), &bars, 100);
}

#[test]
fn lookahead_adx() {
    let bars = make_test_bars(200);
    for line in [AdxLine::Adx, AdxLine::PlusDi, AdxLine::MinusDi] {
        assert_no_lookahead(&Adx::new(14, line), &bars, 100);
    }
}

#[test]
fn lookahead_vwap() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Vwap::new(20), &bars, 100);
}

// ── Strategies ───────────────────────────────────────────────────────

#[test]
fn lookahead_strategies() {
    let bars = make_test_bars(200);
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(SmaCrossover::new(5, 20)),
        Box::new(SmaCrossover::default()),
        Box::new(Momentum::default()),
        Box::new(BollingerStrategy::default()),
        Box::new(RsiReversal::default()),
        Box::new(MacdCrossover::default()),
        Box::new(StochasticOscillator::default()),
        Box::new(AdxTrend::default()),
        Box::new(VwapReversion::default()),
        Box::new(MeanReversion::default()),
        Box::new(BuyAndHold),
    ];
    for strategy in &strategies {
        assert_strategy_no_lookahead(strategy.as_ref(), &bars, 100);
    }
}
