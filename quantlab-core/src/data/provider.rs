//! Data provider trait and the local-file provider.
//!
//! Providers abstract over where bars come from so the runner can swap a
//! directory of files for an in-memory source in tests.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::io::{read_bars_csv, read_bars_parquet};
use super::DataError;
use crate::domain::BarSeries;

/// Trait for bar data sources.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Bars for `symbol`, restricted to `[start, end]` when given (inclusive).
    fn fetch(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<BarSeries, DataError>;
}

/// Reads `{dir}/{SYMBOL}.csv`, falling back to `{dir}/{SYMBOL}.parquet`.
#[derive(Debug, Clone)]
pub struct CsvDirectoryProvider {
    dir: PathBuf,
}

impl CsvDirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, symbol: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", symbol.to_uppercase()))
    }
}

impl DataProvider for CsvDirectoryProvider {
    fn name(&self) -> &str {
        "csv-directory"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<BarSeries, DataError> {
        let csv = self.path_for(symbol, "csv");
        let parquet = self.path_for(symbol, "parquet");
        let series = if csv.exists() {
            read_bars_csv(&csv, Some(symbol))?
        } else if parquet.exists() {
            read_bars_parquet(&parquet, Some(symbol))?
        } else {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
                reason: format!("no {} or {} in {}", file_name(&csv), file_name(&parquet), self.dir.display()),
            });
        };

        let full_len = series.len();
        let sliced = restrict(series, start, end).ok_or_else(|| DataError::NoData {
            symbol: symbol.to_string(),
            reason: format!("no bars between {start:?} and {end:?}"),
        })?;
        debug!(symbol, bars = sliced.len(), of = full_len, "fetched bars");
        Ok(sliced)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Restrict a series to an inclusive date range; open ends are unbounded.
pub(crate) fn restrict(
    series: BarSeries,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<BarSeries> {
    if start.is_none() && end.is_none() {
        return Some(series);
    }
    let lo = start
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(series.first().timestamp);
    let hi = end
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or(series.last().timestamp);
    series.slice_between(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;

    fn series() -> BarSeries {
        let bars = (1..=5)
            .map(|d| Bar {
                timestamp: NaiveDate::from_ymd_opt(2024, 1, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: d as f64,
                volume: None,
            })
            .collect();
        BarSeries::new(Some("X".into()), bars).unwrap()
    }

    #[test]
    fn restrict_is_inclusive() {
        let s = restrict(
            series(),
            NaiveDate::from_ymd_opt(2024, 1, 2),
            NaiveDate::from_ymd_opt(2024, 1, 4),
        )
        .unwrap();
        assert_eq!(s.closes(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn restrict_open_ended() {
        let s = restrict(series(), NaiveDate::from_ymd_opt(2024, 1, 4), None).unwrap();
        assert_eq!(s.closes(), vec![4.0, 5.0]);
    }

    #[test]
    fn restrict_out_of_range_is_none() {
        assert!(restrict(series(), NaiveDate::from_ymd_opt(2025, 1, 1), None).is_none());
    }

    #[test]
    fn missing_file_is_no_data() {
        let provider = CsvDirectoryProvider::new("/nonexistent/quantlab");
        let err = provider.fetch("spy", None, None).unwrap_err();
        assert!(matches!(err, DataError::NoData { ref symbol, .. } if symbol == "spy"));
    }
}
