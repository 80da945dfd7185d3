//! Named numeric parameters passed to plain signal functions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::StrategyError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyParams {
    values: BTreeMap<String, f64>,
}

impl StrategyParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Float parameter, falling back to `default` when absent.
    pub fn f64_or(&self, name: &str, default: f64) -> Result<f64, StrategyError> {
        match self.get(name) {
            None => Ok(default),
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(StrategyError::InvalidParameter {
                name: name.to_string(),
                reason: format!("must be finite, got {v}"),
            }),
        }
    }

    /// Window-style parameter: a positive whole number.
    pub fn window_or(&self, name: &str, default: usize) -> Result<usize, StrategyError> {
        match self.get(name) {
            None => Ok(default),
            Some(v) if v >= 1.0 && v.fract() == 0.0 && v.is_finite() => Ok(v as usize),
            Some(v) => Err(StrategyError::InvalidParameter {
                name: name.to_string(),
                reason: format!("must be a positive integer, got {v}"),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
