//! Reading and writing bar tables with polars.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use super::schema::{BarColumns, BarSchema};
use super::DataError;
use crate::domain::{Bar, BarSeries};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Read a bar CSV. The date column may be a date, a datetime or text.
pub fn read_bars_csv(path: &Path, symbol: Option<&str>) -> Result<BarSeries, DataError> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_try_parse_dates(true)
        .finish()?
        .collect()?;
    debug!(path = %path.display(), rows = df.height(), "read bar csv");
    bars_from_dataframe(&df, symbol)
}

/// Read a bar Parquet file.
pub fn read_bars_parquet(path: &Path, symbol: Option<&str>) -> Result<BarSeries, DataError> {
    let file = File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    debug!(path = %path.display(), rows = df.height(), "read bar parquet");
    bars_from_dataframe(&df, symbol)
}

/// Convert a validated frame into a canonical bar series.
///
/// Rows are sorted by timestamp and duplicate timestamps dropped (first
/// wins). Null prices become NaN; null volume becomes `None`.
pub fn bars_from_dataframe(df: &DataFrame, symbol: Option<&str>) -> Result<BarSeries, DataError> {
    let columns = BarSchema::validate(df)?;
    let timestamps = timestamp_column(df, &columns)?;

    let open = price_column(df, &columns.open)?;
    let high = price_column(df, &columns.high)?;
    let low = price_column(df, &columns.low)?;
    let close = price_column(df, &columns.close)?;
    let volume = match &columns.volume {
        Some(name) => Some(optional_column(df, name)?),
        None => None,
    };

    let bars = (0..df.height())
        .map(|i| Bar {
            timestamp: timestamps[i],
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            volume: volume.as_ref().and_then(|v| v[i]),
        })
        .collect();

    BarSeries::new(symbol.map(str::to_string), canonicalize(bars))
}

/// Build a frame with columns `Date, Open, High, Low, Close, Volume`.
pub fn bars_to_dataframe(series: &BarSeries) -> Result<DataFrame, DataError> {
    let bars = series.bars();
    let millis: Vec<i64> = bars
        .iter()
        .map(|b| b.timestamp.and_utc().timestamp_millis())
        .collect();
    let date = Column::new("Date".into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let volume: Vec<Option<f64>> = bars.iter().map(|b| b.volume).collect();

    let df = DataFrame::new(vec![
        date,
        Column::new("Open".into(), series.opens()),
        Column::new("High".into(), series.highs()),
        Column::new("Low".into(), series.lows()),
        Column::new("Close".into(), series.closes()),
        Column::new("Volume".into(), volume),
    ])?;
    Ok(df)
}

/// Write a bar series as CSV with a header row.
pub fn write_bars_csv(series: &BarSeries, path: &Path) -> Result<(), DataError> {
    let mut df = bars_to_dataframe(series)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    debug!(path = %path.display(), rows = df.height(), "wrote bar csv");
    Ok(())
}

/// Sort by timestamp and drop duplicate timestamps, keeping the first
/// occurrence in input order.
pub fn canonicalize(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
    bars
}

fn price_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, DataError> {
    Ok(optional_column(df, name)?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn optional_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DataError> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let ca = column.f64()?;
    Ok(ca.into_iter().collect())
}

fn timestamp_column(df: &DataFrame, columns: &BarColumns) -> Result<Vec<NaiveDateTime>, DataError> {
    let column = df.column(&columns.timestamp)?;
    match column.dtype() {
        DataType::String => {
            let ca = column.str()?;
            ca.into_iter()
                .enumerate()
                .map(|(row, value)| {
                    let text = value.unwrap_or_default();
                    parse_timestamp(text).ok_or_else(|| DataError::InvalidTimestamp {
                        row,
                        value: text.to_string(),
                    })
                })
                .collect()
        }
        _ => {
            let millis = column
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .cast(&DataType::Int64)?;
            let ca = millis.i64()?;
            ca.into_iter()
                .enumerate()
                .map(|(row, value)| {
                    value
                        .and_then(DateTime::from_timestamp_millis)
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| DataError::InvalidTimestamp {
                            row,
                            value: format!("{value:?}"),
                        })
                })
                .collect()
        }
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            timestamp: ts(2024, 1, day),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: Some(1000.0),
        }
    }

    #[test]
    fn parses_common_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-02"), Some(ts(2024, 1, 2)));
        assert_eq!(
            parse_timestamp("2024-01-02 15:30:00"),
            ts(2024, 1, 2).date().and_hms_opt(15, 30, 0)
        );
        assert_eq!(
            parse_timestamp("2024-01-02T00:00:00.000"),
            Some(ts(2024, 1, 2))
        );
        assert_eq!(parse_timestamp("02/01/2024"), None);
    }

    #[test]
    fn canonicalize_sorts_and_keeps_first_duplicate() {
        let bars = vec![bar(3, 30.0), bar(1, 10.0), bar(3, 99.0), bar(2, 20.0)];
        let out = canonicalize(bars);
        let closes: Vec<f64> = out.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn string_dates_and_integer_prices() {
        let df = DataFrame::new(vec![
            Column::new("Date".into(), &["2024-01-03", "2024-01-02"]),
            Column::new("Open".into(), &[2i64, 1]),
            Column::new("High".into(), &[3i64, 2]),
            Column::new("Low".into(), &[1i64, 0]),
            Column::new("Close".into(), &[2i64, 1]),
        ])
        .unwrap();
        let series = bars_from_dataframe(&df, Some("SPY")).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0]);
        assert_eq!(series.symbol(), Some("SPY"));
        assert!(!series.has_volume());
    }

    #[test]
    fn unparseable_date_is_reported_with_row() {
        let df = DataFrame::new(vec![
            Column::new("Date".into(), &["2024-01-02", "yesterday"]),
            Column::new("Open".into(), &[1.0, 1.0]),
            Column::new("High".into(), &[1.0, 1.0]),
            Column::new("Low".into(), &[1.0, 1.0]),
            Column::new("Close".into(), &[1.0, 1.0]),
        ])
        .unwrap();
        let err = bars_from_dataframe(&df, None).unwrap_err();
        assert!(matches!(err, DataError::InvalidTimestamp { row: 1, .. }));
    }

    #[test]
    fn dataframe_round_trip_keeps_timestamps_and_volume() {
        let series = BarSeries::new(None, vec![bar(2, 10.0), bar(3, 11.0)]).unwrap();
        let df = bars_to_dataframe(&series).unwrap();
        assert_eq!(df.height(), 2);
        let back = bars_from_dataframe(&df, None).unwrap();
        assert_eq!(back.timestamps(), series.timestamps());
        assert_eq!(back.bars()[1].volume, Some(1000.0));
    }
}
