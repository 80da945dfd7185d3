//! Dollar-cost averaging staircase.
//!
//! Exposure rises by 1 / periods at the first bar of every month (or ISO
//! week) and never exceeds 1. `periods` is the number of distinct months or
//! weeks in the series, so the step size depends on the full calendar span
//! of the input.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::BarSeries;
use crate::signal::{SignalTable, Strategy, StrategyError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DcaFrequency {
    #[default]
    Monthly,
    Weekly,
}

impl DcaFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            DcaFrequency::Monthly => "monthly",
            DcaFrequency::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DollarCostAveraging {
    frequency: DcaFrequency,
    name: String,
}

impl DollarCostAveraging {
    pub fn new(frequency: DcaFrequency) -> Self {
        Self {
            frequency,
            name: format!("dca_{}", frequency.as_str()),
        }
    }

    /// Index of the first bar in each calendar period.
    fn buy_points(&self, bars: &BarSeries) -> Vec<usize> {
        let mut seen = HashSet::new();
        bars.bars()
            .iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                let date = bar.timestamp.date();
                let key = match self.frequency {
                    DcaFrequency::Monthly => (date.year(), date.month()),
                    DcaFrequency::Weekly => {
                        let week = date.iso_week();
                        (week.year(), week.week())
                    }
                };
                seen.insert(key).then_some(i)
            })
            .collect()
    }
}

impl Default for DollarCostAveraging {
    fn default() -> Self {
        Self::new(DcaFrequency::Monthly)
    }
}

impl Strategy for DollarCostAveraging {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError> {
        let points = self.buy_points(bars);
        let mut is_buy = vec![false; bars.len()];
        for &i in &points {
            is_buy[i] = true;
        }

        // k-th buy point holds k / periods; the last one is exactly 1.
        let periods = points.len().max(1) as f64;
        let mut bought = 0usize;
        let signal = is_buy
            .iter()
            .map(|&buy| {
                if buy {
                    bought += 1;
                }
                (bought as f64 / periods).min(1.0)
            })
            .collect();

        SignalTable::from_signal(bars.timestamps(), signal)?.with_flag_column("buy_point", &is_buy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use chrono::NaiveDate;

    fn daily(start: NaiveDate, days: i64) -> BarSeries {
        let bars = (0..days)
            .map(|i| Bar {
                timestamp: (start + chrono::Duration::days(i)).and_hms_opt(0, 0, 0).unwrap(),
                open: 10.0,
                high: 10.0,
                low: 10.0,
                close: 10.0,
                volume: None,
            })
            .collect();
        BarSeries::new(None, bars).unwrap()
    }

    #[test]
    fn monthly_staircase_reaches_one() {
        // Jan 30 .. Mar 2: three months
        let bars = daily(NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(), 33);
        let t = DollarCostAveraging::new(DcaFrequency::Monthly)
            .generate_signals(&bars)
            .unwrap();
        let s = t.signal();
        assert!((s[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((s[1] - 1.0 / 3.0).abs() < 1e-12);
        // Feb 1
        assert!((s[2] - 2.0 / 3.0).abs() < 1e-12);
        assert!((s[32] - 1.0).abs() < 1e-12);
        assert!(s.iter().all(|&v| v <= 1.0));
    }

    #[test]
    fn staircase_ends_exactly_at_one() {
        // Jan 1 .. Jul 1: seven buy points, 1/7 does not sum exactly
        let bars = daily(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), 182);
        let t = DollarCostAveraging::new(DcaFrequency::Monthly)
            .generate_signals(&bars)
            .unwrap();
        let s = t.signal();
        assert_eq!(s[s.len() - 1], 1.0);
        assert_eq!(s[s.len() - 2], 6.0 / 7.0);
        assert_eq!(s[0], 1.0 / 7.0);
    }

    #[test]
    fn weekly_steps_on_iso_week_boundaries() {
        // Wed 2024-01-03 .. Tue 2024-01-16: weeks 1, 2, 3
        let bars = daily(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 14);
        let t = DollarCostAveraging::new(DcaFrequency::Weekly)
            .generate_signals(&bars)
            .unwrap();
        let buys = t.column("buy_point").unwrap();
        assert_eq!(buys.iter().filter(|&&b| b == 1.0).count(), 3);
        // Monday 2024-01-08 starts week 2
        assert_eq!(buys[5], 1.0);
    }
}
