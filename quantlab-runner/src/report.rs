//! Reporting and export for batch records and single results.
//!
//! Tables are plain fixed-width text. Exports:
//! - **CSV**: one row per batch record
//! - **JSON**: a single backtest result, pretty-printed

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use quantlab_core::engine::BacktestResult;

use crate::batch::BatchRecord;
use crate::runner::RunError;

const RULE_WIDTH: usize = 96;

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

fn cell(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

// ─── Comparison ─────────────────────────────────────────────────────

/// Strategy / total return / Sharpe / max drawdown, one row per record.
pub fn comparison_table(records: &[BatchRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<8} {:<36} {:>14} {:>12} {:>14}",
        "Symbol", "Period", "Strategy", "Total Return %", "Sharpe", "Max Drawdown %"
    );
    let _ = writeln!(out, "{}", rule('-'));
    for r in records {
        let _ = writeln!(
            out,
            "{:<8} {:<8} {:<36} {:>14} {:>12} {:>14}",
            r.symbol,
            r.period,
            r.strategy,
            cell(r.total_return, 2),
            cell(r.sharpe_ratio, 2),
            cell(r.max_drawdown, 2)
        );
    }
    out
}

/// Same columns for a set of single-run results.
pub fn results_table(results: &[BacktestResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36} {:>14} {:>12} {:>14}",
        "Strategy", "Total Return %", "Sharpe", "Max Drawdown %"
    );
    let _ = writeln!(out, "{}", "-".repeat(79));
    for r in results {
        let _ = writeln!(
            out,
            "{:<36} {:>14} {:>12} {:>14}",
            r.strategy,
            cell(r.total_return, 2),
            cell(r.sharpe_ratio, 2),
            cell(r.max_drawdown, 2)
        );
    }
    out
}

// ─── Consistency ────────────────────────────────────────────────────

/// Distribution of one strategy's total return across every symbol and period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyRow {
    pub strategy: String,
    pub avg_return: f64,
    pub median_return: f64,
    /// Sample std dev (ddof = 1); NaN with a single period.
    pub std_dev: f64,
    pub positive_periods: usize,
    pub total_periods: usize,
    /// Share of periods with a positive total return, in percent.
    pub positive_rate: f64,
    pub best: f64,
    pub worst: f64,
}

/// Per-strategy consistency, sorted by average return (best first).
pub fn consistency(records: &[BatchRecord]) -> Vec<ConsistencyRow> {
    let mut by_strategy: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        by_strategy
            .entry(r.strategy.as_str())
            .or_default()
            .push(r.total_return);
    }

    let mut rows: Vec<ConsistencyRow> = by_strategy
        .into_iter()
        .map(|(strategy, mut returns)| {
            returns.sort_by(f64::total_cmp);
            let n = returns.len();
            let mean = returns.iter().sum::<f64>() / n as f64;
            let std_dev = if n < 2 {
                f64::NAN
            } else {
                let ss: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum();
                (ss / (n - 1) as f64).sqrt()
            };
            let positive = returns.iter().filter(|&&r| r > 0.0).count();
            ConsistencyRow {
                strategy: strategy.to_string(),
                avg_return: mean,
                median_return: median(&returns),
                std_dev,
                positive_periods: positive,
                total_periods: n,
                positive_rate: positive as f64 / n as f64 * 100.0,
                best: returns[n - 1],
                worst: returns[0],
            }
        })
        .collect();

    rows.sort_by(|a, b| b.avg_return.total_cmp(&a.avg_return));
    rows
}

/// Median of an already sorted, non-empty slice.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

pub fn consistency_table(rows: &[ConsistencyRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36} {:>9} {:>9} {:>9} {:>9} {:>8} {:>9} {:>9}",
        "Strategy", "Avg %", "Median %", "Std Dev", "Positive", "Rate %", "Best %", "Worst %"
    );
    let _ = writeln!(out, "{}", rule('-'));
    for r in rows {
        let _ = writeln!(
            out,
            "{:<36} {:>9} {:>9} {:>9} {:>9} {:>8} {:>9} {:>9}",
            r.strategy,
            cell(r.avg_return, 2),
            cell(r.median_return, 2),
            cell(r.std_dev, 2),
            format!("{}/{}", r.positive_periods, r.total_periods),
            cell(r.positive_rate, 1),
            cell(r.best, 2),
            cell(r.worst, 2)
        );
    }
    out
}

// ─── Rankings and summaries ─────────────────────────────────────────

/// The `n` records with the highest total return, best first.
pub fn top_n(records: &[BatchRecord], n: usize) -> Vec<BatchRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.total_return.total_cmp(&a.total_return));
    sorted.truncate(n);
    sorted
}

/// The `n` records with the lowest total return, worst first.
pub fn bottom_n(records: &[BatchRecord], n: usize) -> Vec<BatchRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.total_return.total_cmp(&b.total_return));
    sorted.truncate(n);
    sorted
}

/// Averages across every strategy and symbol for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: String,
    pub avg_total_return: f64,
    pub avg_benchmark_return: f64,
    pub avg_sharpe_ratio: f64,
    pub avg_max_drawdown: f64,
}

/// One row per period label, in label order.
pub fn period_summary(records: &[BatchRecord]) -> Vec<PeriodSummary> {
    let mut by_period: BTreeMap<&str, Vec<&BatchRecord>> = BTreeMap::new();
    for r in records {
        by_period.entry(r.period.as_str()).or_default().push(r);
    }
    by_period
        .into_iter()
        .map(|(period, rows)| {
            let avg = |f: fn(&BatchRecord) -> f64| {
                rows.iter().map(|r| f(r)).sum::<f64>() / rows.len() as f64
            };
            PeriodSummary {
                period: period.to_string(),
                avg_total_return: avg(|r| r.total_return),
                avg_benchmark_return: avg(|r| r.benchmark_return),
                avg_sharpe_ratio: avg(|r| r.sharpe_ratio),
                avg_max_drawdown: avg(|r| r.max_drawdown),
            }
        })
        .collect()
}

pub fn period_summary_table(rows: &[PeriodSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>14} {:>14} {:>10} {:>14}",
        "Period", "Total Return %", "Benchmark %", "Sharpe", "Max Drawdown %"
    );
    let _ = writeln!(out, "{}", "-".repeat(64));
    for r in rows {
        let _ = writeln!(
            out,
            "{:<8} {:>14} {:>14} {:>10} {:>14}",
            r.period,
            cell(r.avg_total_return, 2),
            cell(r.avg_benchmark_return, 2),
            cell(r.avg_sharpe_ratio, 2),
            cell(r.avg_max_drawdown, 2)
        );
    }
    out
}

/// Total return (%) for one symbol: strategies down, periods across.
pub fn return_matrix(records: &[BatchRecord], symbol: &str) -> String {
    let rows: Vec<&BatchRecord> = records.iter().filter(|r| r.symbol == symbol).collect();
    let periods: BTreeSet<&str> = rows.iter().map(|r| r.period.as_str()).collect();
    let mut strategies: Vec<&str> = Vec::new();
    for r in &rows {
        if !strategies.contains(&r.strategy.as_str()) {
            strategies.push(r.strategy.as_str());
        }
    }

    let mut out = String::new();
    let _ = write!(out, "{:<36}", symbol);
    for p in &periods {
        let _ = write!(out, " {:>8}", p);
    }
    let _ = writeln!(out);
    for strategy in strategies {
        let _ = write!(out, "{strategy:<36}");
        for p in &periods {
            let value = rows
                .iter()
                .find(|r| r.strategy == strategy && r.period == *p)
                .map_or(f64::NAN, |r| r.total_return);
            let _ = write!(out, " {:>8}", cell(value, 1));
        }
        let _ = writeln!(out);
    }
    out
}

// ─── Export ─────────────────────────────────────────────────────────

/// Write batch records as CSV with a header row.
pub fn write_records_csv(path: &Path, records: &[BatchRecord]) -> Result<(), RunError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Serialize one result (metrics plus the per-bar frame) to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String, RunError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn write_result_json(path: &Path, result: &BacktestResult) -> Result<(), RunError> {
    std::fs::write(path, export_json(result)?)?;
    Ok(())
}
