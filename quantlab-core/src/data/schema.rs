use polars::prelude::*;

use super::DataError;

const DATE_ALIASES: [&str; 3] = ["date", "datetime", "timestamp"];

/// Resolved column names of a bar table, as they appear in the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarColumns {
    pub timestamp: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: Option<String>,
}

/// Expected schema for bar data.
///
/// Required: a date column (`Date`, `Datetime` or `timestamp`) and numeric
/// `Open`, `High`, `Low`, `Close`. `Volume` is optional and any other column
/// (e.g. `Symbol`) is ignored. Names match case-insensitively.
pub struct BarSchema;

impl BarSchema {
    /// Map the frame's columns onto the bar fields.
    pub fn resolve(df: &DataFrame) -> Result<BarColumns, DataError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        let find = |wanted: &str| -> Option<String> {
            names.iter().find(|n| n.eq_ignore_ascii_case(wanted)).cloned()
        };
        let require = |wanted: &str| -> Result<String, DataError> {
            find(wanted).ok_or_else(|| DataError::MissingColumn(capitalize(wanted)))
        };

        let timestamp = DATE_ALIASES
            .iter()
            .find_map(|alias| find(alias))
            .ok_or_else(|| DataError::MissingColumn("Date".to_string()))?;

        Ok(BarColumns {
            timestamp,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }

    /// Validate column presence and types.
    pub fn validate(df: &DataFrame) -> Result<BarColumns, DataError> {
        let columns = Self::resolve(df)?;

        let date_dtype = df.column(&columns.timestamp)?.dtype();
        if !matches!(
            date_dtype,
            DataType::Date | DataType::Datetime(_, _) | DataType::String
        ) {
            return Err(DataError::TypeMismatch {
                column: columns.timestamp.clone(),
                expected: "date, datetime or string".to_string(),
                actual: date_dtype.to_string(),
            });
        }

        let numeric = [
            Some(&columns.open),
            Some(&columns.high),
            Some(&columns.low),
            Some(&columns.close),
            columns.volume.as_ref(),
        ];
        for name in numeric.into_iter().flatten() {
            let dtype = df.column(name)?.dtype();
            if !is_numeric(dtype) {
                return Err(DataError::TypeMismatch {
                    column: name.clone(),
                    expected: "numeric".to_string(),
                    actual: dtype.to_string(),
                });
            }
        }

        Ok(columns)
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
