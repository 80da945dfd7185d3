//! Backtest result record and its per-bar frame.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Per-bar series derived during a backtest, all the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestFrame {
    pub timestamps: Vec<NaiveDateTime>,
    pub close: Vec<f64>,
    /// Normalized signal after the join (before clamping and lag).
    pub signal: Vec<f64>,
    pub position: Vec<f64>,
    pub returns: Vec<f64>,
    pub strategy_returns: Vec<f64>,
    pub equity_curve: Vec<f64>,
    pub benchmark_curve: Vec<f64>,
    pub rolling_max: Vec<f64>,
    pub drawdown: Vec<f64>,
}

impl BacktestFrame {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Summary metrics plus the full frame. Percent fields are already × 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: Option<String>,
    pub strategy: String,
    pub total_return: f64,
    pub benchmark_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
    pub win_rate: f64,
    pub initial_capital: f64,
    pub frame: BacktestFrame,
}

impl BacktestResult {
    /// Last value of the equity curve.
    pub fn final_capital(&self) -> f64 {
        self.frame
            .equity_curve
            .last()
            .copied()
            .unwrap_or(self.initial_capital)
    }

    pub fn excess_return(&self) -> f64 {
        self.total_return - self.benchmark_return
    }

    /// Fixed-width text summary.
    pub fn summary_report(&self) -> String {
        let rule = "=".repeat(50);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "BACKTEST RESULTS SUMMARY");
        if let Some(symbol) = &self.symbol {
            let _ = writeln!(out, "Symbol:            {symbol}");
        }
        let _ = writeln!(out, "Strategy:          {}", self.strategy);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Total Return:      {:.2}%", self.total_return);
        let _ = writeln!(out, "Benchmark Return:  {:.2}%", self.benchmark_return);
        let _ = writeln!(out, "Excess Return:     {:.2}%", self.excess_return());
        let _ = writeln!(out, "Sharpe Ratio:      {:.2}", self.sharpe_ratio);
        let _ = writeln!(out, "Max Drawdown:      {:.2}%", self.max_drawdown);
        let _ = writeln!(out, "Volatility:        {:.2}%", self.volatility);
        let _ = writeln!(out, "Win Rate:          {:.2}%", self.win_rate);
        let _ = writeln!(out, "Initial Capital:   ${}", money(self.initial_capital));
        let _ = writeln!(out, "Final Capital:     ${}", money(self.final_capital()));
        let _ = write!(out, "{rule}");
        out
    }
}

/// Two decimals with thousands separators.
fn money(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}
