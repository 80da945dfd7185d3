//! Signal table: a `signal` column keyed by timestamp, plus diagnostics.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::StrategyError;

/// Strategy output keyed by timestamp.
///
/// `signal` is the desired exposure per timestamp. `positions` is its
/// discrete first difference (NaN at the first row). Any other columns are
/// diagnostics (indicator values, crossover flags) that the engine ignores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalTable {
    timestamps: Vec<NaiveDateTime>,
    signal: Vec<f64>,
    positions: Vec<f64>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl SignalTable {
    /// Build a table from a signal column. Timestamps must be unique and the
    /// lengths must match.
    pub fn from_signal(
        timestamps: Vec<NaiveDateTime>,
        signal: Vec<f64>,
    ) -> Result<Self, StrategyError> {
        if timestamps.len() != signal.len() {
            return Err(StrategyError::MalformedTable(format!(
                "{} timestamps but {} signal values",
                timestamps.len(),
                signal.len()
            )));
        }
        let mut seen = HashSet::with_capacity(timestamps.len());
        for ts in &timestamps {
            if !seen.insert(*ts) {
                return Err(StrategyError::MalformedTable(format!(
                    "duplicate timestamp {ts}"
                )));
            }
        }
        let positions = diff(&signal);
        Ok(Self {
            timestamps,
            signal,
            positions,
            columns: BTreeMap::new(),
        })
    }

    /// Attach a diagnostic column.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, StrategyError> {
        let name = name.into();
        if values.len() != self.timestamps.len() {
            return Err(StrategyError::MalformedTable(format!(
                "column '{name}' has {} values, expected {}",
                values.len(),
                self.timestamps.len()
            )));
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    /// Attach a boolean diagnostic column, stored as 1.0 / 0.0.
    pub fn with_flag_column(
        self,
        name: impl Into<String>,
        flags: &[bool],
    ) -> Result<Self, StrategyError> {
        let values = flags.iter().map(|&f| if f { 1.0 } else { 0.0 }).collect();
        self.with_column(name, values)
    }

    /// Override the positions column (e.g. when a strategy marks entries explicitly).
    pub fn with_positions(mut self, positions: Vec<f64>) -> Result<Self, StrategyError> {
        if positions.len() != self.timestamps.len() {
            return Err(StrategyError::MalformedTable(format!(
                "positions has {} values, expected {}",
                positions.len(),
                self.timestamps.len()
            )));
        }
        self.positions = positions;
        Ok(self)
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Left-join the signal column onto `index`.
    ///
    /// Timestamps with no matching row, and rows whose signal is NaN, get 0.
    /// Returns the aligned signal and the number of unmatched timestamps.
    pub fn align_to(&self, index: &[NaiveDateTime]) -> (Vec<f64>, usize) {
        let lookup: HashMap<NaiveDateTime, f64> = self
            .timestamps
            .iter()
            .copied()
            .zip(self.signal.iter().copied())
            .collect();

        let mut unmatched = 0;
        let aligned = index
            .iter()
            .map(|ts| match lookup.get(ts) {
                Some(v) if v.is_nan() => 0.0,
                Some(v) => *v,
                None => {
                    unmatched += 1;
                    0.0
                }
            })
            .collect();
        (aligned, unmatched)
    }
}

/// First difference, NaN at index 0.
fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = values[i] - values[i - 1];
    }
    out
}
