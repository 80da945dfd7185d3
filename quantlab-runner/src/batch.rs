//! Batch driver: every symbol × period × strategy combination, each run
//! independently.
//!
//! A combination that fails is logged, recorded as a [`BatchFailure`] and
//! skipped; the rest of the batch continues. Combinations are run with rayon
//! when `batch.parallel` is set; output order is the same either way.

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use quantlab_core::data::DataProvider;
use quantlab_core::domain::BarSeries;
use quantlab_core::engine::{run_backtest, BacktestResult};
use quantlab_core::signal::{SignalSource, Strategy, StrategyParams};

use crate::config::RunConfig;
use crate::data_loader::{load_series, LoadOptions};
use crate::runner::RunError;

/// How each symbol's series is cut into evaluation periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSplit {
    /// One period spanning the whole series.
    #[default]
    None,
    /// One period per calendar year (Jan 1 to Dec 31).
    Yearly,
}

/// A labelled slice of a symbol's series.
#[derive(Debug, Clone)]
pub struct Period {
    pub label: String,
    pub series: BarSeries,
}

/// Label of the single period produced by [`PeriodSplit::None`].
pub const FULL_PERIOD: &str = "full";

/// Cut `series` into periods. Years without bars are omitted.
pub fn split_periods(series: &BarSeries, split: PeriodSplit) -> Vec<Period> {
    match split {
        PeriodSplit::None => vec![Period {
            label: FULL_PERIOD.to_string(),
            series: series.clone(),
        }],
        PeriodSplit::Yearly => {
            let first = series.first().timestamp.year();
            let last = series.last().timestamp.year();
            (first..=last)
                .filter_map(|year| {
                    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
                    let end = NaiveDate::from_ymd_opt(year, 12, 31)?.and_hms_opt(23, 59, 59)?;
                    series.slice_between(start, end).map(|slice| Period {
                        label: year.to_string(),
                        series: slice,
                    })
                })
                .collect()
        }
    }
}

/// Metrics of one successful combination. Percent fields are already × 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub symbol: String,
    pub period: String,
    pub strategy: String,
    pub total_return: f64,
    pub benchmark_return: f64,
    pub excess_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
    pub win_rate: f64,
    pub bars: usize,
    /// True when the bars were generated rather than loaded.
    pub synthetic: bool,
}

impl BatchRecord {
    fn from_result(
        symbol: &str,
        period: &str,
        strategy: &str,
        synthetic: bool,
        result: &BacktestResult,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            period: period.to_string(),
            strategy: strategy.to_string(),
            total_return: result.total_return,
            benchmark_return: result.benchmark_return,
            excess_return: result.excess_return(),
            sharpe_ratio: result.sharpe_ratio,
            max_drawdown: result.max_drawdown,
            volatility: result.volatility,
            win_rate: result.win_rate,
            bars: result.frame.len(),
            synthetic,
        }
    }
}

/// A combination that could not be evaluated.
///
/// `period` and `strategy` are `None` when the symbol itself failed to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub symbol: String,
    pub period: Option<String>,
    pub strategy: Option<String>,
    pub error: String,
}

/// Everything a batch produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub records: Vec<BatchRecord>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if any record was computed on synthetic bars.
    pub fn has_synthetic(&self) -> bool {
        self.records.iter().any(|r| r.synthetic)
    }
}

struct LoadedSymbol {
    symbol: String,
    synthetic: bool,
    periods: Vec<Period>,
}

struct Job<'a> {
    symbol: &'a LoadedSymbol,
    period: &'a Period,
    label: &'a str,
    strategy: &'a dyn Strategy,
}

/// Run every configured combination.
///
/// Errors only for an invalid configuration; data and backtest failures are
/// collected into [`BatchOutcome::failures`].
pub fn run_batch(
    config: &RunConfig,
    provider: Option<&dyn DataProvider>,
) -> Result<BatchOutcome, RunError> {
    config.validate()?;

    let strategies: Vec<(String, Box<dyn Strategy>)> = config
        .strategies
        .iter()
        .map(|spec| -> Result<_, RunError> { Ok((spec.label(), spec.build()?)) })
        .collect::<Result<_, _>>()?;

    let opts = LoadOptions {
        start: config.data.start,
        end: config.data.end,
        synthetic: config.data.synthetic,
    };

    let mut outcome = BatchOutcome::default();
    let mut loaded = Vec::with_capacity(config.data.symbols.len());
    for symbol in &config.data.symbols {
        match load_series(symbol, provider, &opts) {
            Ok(series) => loaded.push(LoadedSymbol {
                symbol: symbol.clone(),
                synthetic: series.is_synthetic(),
                periods: split_periods(&series.series, config.batch.split),
            }),
            Err(e) => {
                warn!(symbol = symbol.as_str(), error = %e, "skipping symbol");
                outcome.failures.push(BatchFailure {
                    symbol: symbol.clone(),
                    period: None,
                    strategy: None,
                    error: e.to_string(),
                });
            }
        }
    }

    let strategies = &strategies;
    let jobs: Vec<Job<'_>> = loaded
        .iter()
        .flat_map(|symbol| {
            symbol.periods.iter().flat_map(move |period| {
                strategies.iter().map(move |(label, strategy)| Job {
                    symbol,
                    period,
                    label: label.as_str(),
                    strategy: strategy.as_ref(),
                })
            })
        })
        .collect();

    let capital = config.backtest.initial_capital;
    let results: Vec<Result<BatchRecord, BatchFailure>> = if config.batch.parallel {
        jobs.par_iter().map(|job| run_job(job, capital)).collect()
    } else {
        jobs.iter().map(|job| run_job(job, capital)).collect()
    };

    for result in results {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(failure) => outcome.failures.push(failure),
        }
    }

    info!(
        combinations = jobs.len(),
        records = outcome.records.len(),
        failures = outcome.failures.len(),
        "batch completed"
    );
    Ok(outcome)
}

fn run_job(job: &Job<'_>, capital: f64) -> Result<BatchRecord, BatchFailure> {
    let symbol = job.symbol.symbol.as_str();
    let period = job.period.label.as_str();
    run_backtest(
        &job.period.series,
        SignalSource::Strategy(job.strategy),
        capital,
        &StrategyParams::new(),
    )
    .map(|result| {
        BatchRecord::from_result(symbol, period, job.label, job.symbol.synthetic, &result)
    })
    .map_err(|e| {
        warn!(symbol, period, strategy = job.label, error = %e, "combination failed");
        BatchFailure {
            symbol: symbol.to_string(),
            period: Some(period.to_string()),
            strategy: Some(job.label.to_string()),
            error: e.to_string(),
        }
    })
}
