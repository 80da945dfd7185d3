//! Bar and BarSeries: the market data units the engine consumes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::data::DataError;
use crate::signal::StrategyError;

/// One time-stamped OHLCV observation.
///
/// Volume is optional: only volume-weighted strategies require it, and they
/// fail with a missing-column error when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume.map_or(true, |v| v >= 0.0)
    }
}

/// Ordered bars for a single symbol.
///
/// Invariants enforced at construction: at least one bar, timestamps
/// strictly increasing (which also rules out duplicates).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSeries {
    symbol: Option<String>,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: Option<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        if bars.is_empty() {
            return Err(DataError::EmptySeries);
        }
        for pair in bars.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(DataError::NonIncreasingTimestamp {
                    previous: pair[0].timestamp,
                    current: pair[1].timestamp,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &Bar {
        &self.bars[0]
    }

    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// True when every bar carries a volume value.
    pub fn has_volume(&self) -> bool {
        self.bars.iter().all(|b| b.volume.is_some())
    }

    /// Volume column, or a missing-column error if any bar lacks volume.
    pub fn volumes(&self) -> Result<Vec<f64>, StrategyError> {
        self.bars
            .iter()
            .map(|b| b.volume.ok_or_else(|| StrategyError::MissingColumn("Volume".into())))
            .collect()
    }

    /// Sub-series with `start <= timestamp <= end`, or `None` if no bar falls in range.
    pub fn slice_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<BarSeries> {
        let bars: Vec<Bar> = self
            .bars
            .iter()
            .filter(|b| b.timestamp >= start && b.timestamp <= end)
            .cloned()
            .collect();
        if bars.is_empty() {
            return None;
        }
        Some(BarSeries {
            symbol: self.symbol.clone(),
            bars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_bar(day: u32) -> Bar {
        Bar {
            timestamp: ts(day),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: Some(50_000.0),
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar(2).is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar(2);
        bar.close = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar(2);
        bar.high = 97.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn series_rejects_empty() {
        let err = BarSeries::new(None, vec![]).unwrap_err();
        assert!(matches!(err, DataError::EmptySeries));
    }

    #[test]
    fn series_rejects_duplicate_timestamp() {
        let err = BarSeries::new(None, vec![sample_bar(2), sample_bar(2)]).unwrap_err();
        assert!(matches!(err, DataError::NonIncreasingTimestamp { .. }));
    }

    #[test]
    fn series_rejects_unsorted() {
        let err = BarSeries::new(None, vec![sample_bar(3), sample_bar(2)]).unwrap_err();
        assert!(matches!(err, DataError::NonIncreasingTimestamp { .. }));
    }

    #[test]
    fn volumes_require_every_bar() {
        let mut b = sample_bar(3);
        b.volume = None;
        let series = BarSeries::new(Some("AAPL".into()), vec![sample_bar(2), b]).unwrap();
        assert!(!series.has_volume());
        let err = series.volumes().unwrap_err();
        assert!(err.to_string().contains("Volume"));
    }

    #[test]
    fn slice_between_is_inclusive() {
        let series = BarSeries::new(
            Some("AAPL".into()),
            vec![sample_bar(2), sample_bar(3), sample_bar(4), sample_bar(5)],
        )
        .unwrap();
        let sub = series.slice_between(ts(3), ts(4)).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.symbol(), Some("AAPL"));
        assert!(series.slice_between(ts(10), ts(20)).is_none());
    }
}
