//! Integration tests for the bundled strategies and their serde specs.

use chrono::{Datelike, NaiveDate};
use quantlab_core::domain::{Bar, BarSeries};
use quantlab_core::engine::run_backtest;
use quantlab_core::signal::{SignalSource, StrategyError, StrategyParams};
use quantlab_core::strategies::{DcaFrequency, StrategySpec};

/// Weekday bars of a trending sine wave with volume.
fn make_series(n: usize) -> BarSeries {
    let mut date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let mut bars = Vec::with_capacity(n);
    for i in 0..n {
        let close = 100.0 + (i as f64 * 0.09).sin() * 12.0 + i as f64 * 0.04;
        let open = close - 0.4;
        bars.push(Bar {
            timestamp: date.and_hms_opt(0, 0, 0).unwrap(),
            open,
            high: open.max(close) + 1.2,
            low: open.min(close) - 1.2,
            close,
            volume: Some(50_000.0 + (i % 17) as f64 * 1_000.0),
        });
        date = date.succ_opt().unwrap();
        while date.weekday().number_from_monday() > 5 {
            date = date.succ_opt().unwrap();
        }
    }
    BarSeries::new(Some("SYN".into()), bars).unwrap()
}

#[test]
fn every_bundled_strategy_runs_end_to_end() {
    let bars = make_series(300);
    for spec in StrategySpec::all_defaults() {
        let strategy = spec.build().unwrap();
        let table = strategy.generate_signals(&bars).unwrap();
        assert_eq!(table.len(), bars.len(), "{}", spec.kind());
        assert!(
            table.signal().iter().all(|s| (0.0..=1.0).contains(s)),
            "{}: signal outside [0, 1]",
            spec.kind()
        );

        let result = run_backtest(
            &bars,
            SignalSource::Strategy(strategy.as_ref()),
            10_000.0,
            &StrategyParams::new(),
        )
        .unwrap();
        assert!(result.total_return.is_finite(), "{}", spec.kind());
        assert!(result.max_drawdown <= 0.0, "{}", spec.kind());
    }
}

#[test]
fn oscillating_prices_trigger_trades() {
    let bars = make_series(300);
    for kind in ["sma_crossover", "macd", "mean_reversion"] {
        let strategy = StrategySpec::from_kind(kind).unwrap().build().unwrap();
        let table = strategy.generate_signals(&bars).unwrap();
        let changes = table
            .positions()
            .iter()
            .filter(|p| !p.is_nan() && **p != 0.0)
            .count();
        assert!(changes >= 2, "{kind}: expected at least one round trip");
    }
}

#[test]
fn spec_deserializes_with_defaults() {
    let spec: StrategySpec = serde_json::from_str(r#"{"type": "rsi", "period": 7}"#).unwrap();
    assert_eq!(
        spec,
        StrategySpec::Rsi {
            period: 7,
            oversold: 30.0,
            overbought: 70.0
        }
    );
    assert_eq!(spec.label(), "RSI (7, 30/70)");

    let dca: StrategySpec =
        serde_json::from_str(r#"{"type": "dca", "frequency": "weekly"}"#).unwrap();
    assert_eq!(
        dca,
        StrategySpec::Dca {
            frequency: DcaFrequency::Weekly
        }
    );

    let hold: StrategySpec = serde_json::from_str(r#"{"type": "buy_and_hold"}"#).unwrap();
    assert_eq!(hold.label(), "[BENCHMARK] Buy & Hold");
}

#[test]
fn unknown_type_is_rejected() {
    assert!(serde_json::from_str::<StrategySpec>(r#"{"type": "martingale"}"#).is_err());
    assert!(StrategySpec::from_kind("martingale").is_none());
}

#[test]
fn invalid_parameters_are_reported_by_name() {
    let spec = StrategySpec::Stochastic {
        k_period: 14,
        d_period: 3,
        oversold: 80.0,
        overbought: 20.0,
    };
    match spec.build() {
        Err(StrategyError::InvalidParameter { name, .. }) => assert_eq!(name, "oversold"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("inverted thresholds must be rejected"),
    }
}

#[test]
fn dca_runs_with_fractional_positions() {
    let bars = make_series(130);
    let strategy = StrategySpec::Dca {
        frequency: DcaFrequency::Monthly,
    }
    .build()
    .unwrap();
    let result = run_backtest(
        &bars,
        SignalSource::Strategy(strategy.as_ref()),
        10_000.0,
        &StrategyParams::new(),
    )
    .unwrap();
    let signal = &result.frame.signal;
    let position = &result.frame.position;
    let n = position.len();
    assert!(position.windows(2).all(|w| w[1] >= w[0]));
    assert!(position.iter().any(|&p| p > 0.0 && p < 1.0));

    // Last bar (2022-07-01) is the seventh month's first bar: the signal
    // reaches 1 there but the position still holds the previous step.
    assert_eq!(bars.last().timestamp.date(), NaiveDate::from_ymd_opt(2022, 7, 1).unwrap());
    assert_eq!(signal[n - 1], 1.0);
    assert_eq!(position[n - 1], signal[n - 2]);
    assert_eq!(position[n - 1], 6.0 / 7.0);
    assert_eq!(position[0], 0.0);
    for t in 1..n {
        assert_eq!(position[t], signal[t - 1]);
    }
}
