//! Serializable run configuration.
//!
//! Everything a batch study needs (capital, data location, symbols, date
//! range, period split, strategy line-up) lives in one [`RunConfig`] value
//! loaded from TOML and passed explicitly into the runner.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use quantlab_core::signal::StrategyError;
use quantlab_core::strategies::StrategySpec;

use crate::batch::PeriodSplit;

/// Default starting capital for every backtest.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

/// Unique identifier for a configuration (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid strategy: {0}")]
    Strategy(#[from] StrategyError),

    #[error("config serialization failed: {0}")]
    Serialize(String),
}

/// Complete configuration for a batch study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub backtest: BacktestSection,

    #[serde(default)]
    pub data: DataSection,

    #[serde(default)]
    pub batch: BatchSection,

    /// Strategy line-up; defaults to the standard roster.
    #[serde(default = "StrategySpec::roster")]
    pub strategies: Vec<StrategySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    #[serde(default = "default_capital")]
    pub initial_capital: f64,
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSection {
    /// Directory holding `{SYMBOL}.csv` / `{SYMBOL}.parquet` files.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Inclusive date range; open ends are unbounded.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,

    /// Generate seeded synthetic bars when a symbol has no data.
    #[serde(default)]
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSection {
    #[serde(default)]
    pub split: PeriodSplit,

    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_capital() -> f64 {
    DEFAULT_INITIAL_CAPITAL
}

fn default_symbols() -> Vec<String> {
    ["AAPL", "MSFT", "GOOGL"].iter().map(|s| s.to_string()).collect()
}

fn default_parallel() -> bool {
    true
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
        }
    }
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            dir: None,
            symbols: default_symbols(),
            start: None,
            end: None,
            synthetic: false,
        }
    }
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            split: PeriodSplit::None,
            parallel: true,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            backtest: BacktestSection::default(),
            data: DataSection::default(),
            batch: BatchSection::default(),
            strategies: StrategySpec::roster(),
        }
    }
}

impl RunConfig {
    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let capital = self.backtest.initial_capital;
        if !(capital > 0.0 && capital.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "initial_capital must be positive, got {capital}"
            )));
        }
        if self.data.symbols.is_empty() {
            return Err(ConfigError::Invalid("no symbols configured".into()));
        }
        if let Some(blank) = self.data.symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank symbol {blank:?}")));
        }
        if let (Some(start), Some(end)) = (self.data.start, self.data.end) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "start {start} is after end {end}"
                )));
            }
        }
        if self.data.dir.is_none() && !self.data.synthetic {
            return Err(ConfigError::Invalid(
                "set data.dir or enable data.synthetic".into(),
            ));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::Invalid("no strategies configured".into()));
        }
        for spec in &self.strategies {
            spec.validate()?;
        }
        Ok(())
    }

    /// Deterministic BLAKE3 hash of the serialized configuration.
    ///
    /// Two configs with identical content share a RunId.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json =
            serde_json::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
