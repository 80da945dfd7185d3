//! Signal interface: the contract every strategy satisfies.
//!
//! A strategy maps a bar series to a signal series. Two call conventions are
//! accepted at the engine boundary:
//! - an object implementing [`Strategy`], which returns a [`SignalTable`]
//! - a plain [`SignalFn`], which returns either a table or a bare sequence
//!
//! Both are wrapped in [`SignalSource`] and normalized to one per-bar signal
//! column before any simulation logic runs.

pub mod params;
pub mod table;

pub use params::StrategyParams;
pub use table::SignalTable;

use thiserror::Error;

use crate::domain::BarSeries;

/// Errors raised while generating signals.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("malformed signal table: {0}")]
    MalformedTable(String),

    #[error("strategy failed: {0}")]
    Other(String),
}

/// Trait for strategy objects.
///
/// Implementations own only their construction-time parameters and are
/// stateless across calls. `generate_signals` must only use bar `t` and
/// earlier to produce the signal at `t`.
pub trait Strategy: Send + Sync {
    /// Human-readable name (e.g., "sma_crossover").
    fn name(&self) -> &str;

    /// Produce a signal table aligned to the bar series index.
    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalTable, StrategyError>;
}

/// What a plain signal function may return.
#[derive(Debug, Clone)]
pub enum SignalOutput {
    Table(SignalTable),
    /// Bare sequence, positionally aligned to the bar series.
    Sequence(Vec<f64>),
}

/// Plain-function call convention.
pub type SignalFn = fn(&BarSeries, &StrategyParams) -> Result<SignalOutput, StrategyError>;

/// Signal provider as seen by the engine.
#[derive(Clone, Copy)]
pub enum SignalSource<'a> {
    Strategy(&'a dyn Strategy),
    Function { name: &'a str, func: SignalFn },
    Precomputed { name: &'a str, output: &'a SignalOutput },
}

impl<'a> SignalSource<'a> {
    pub fn name(&self) -> &str {
        match self {
            SignalSource::Strategy(s) => s.name(),
            SignalSource::Function { name, .. } => name,
            SignalSource::Precomputed { name, .. } => name,
        }
    }

    /// Invoke the provider. Strategy objects ignore `params`; their
    /// parameters were fixed at construction.
    pub fn invoke(
        &self,
        bars: &BarSeries,
        params: &StrategyParams,
    ) -> Result<SignalOutput, StrategyError> {
        match self {
            SignalSource::Strategy(s) => s.generate_signals(bars).map(SignalOutput::Table),
            SignalSource::Function { func, .. } => func(bars, params),
            SignalSource::Precomputed { output, .. } => Ok((*output).clone()),
        }
    }
}

impl<'a> From<&'a dyn Strategy> for SignalSource<'a> {
    fn from(strategy: &'a dyn Strategy) -> Self {
        SignalSource::Strategy(strategy)
    }
}

impl std::fmt::Debug for SignalSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            SignalSource::Strategy(_) => "Strategy",
            SignalSource::Function { .. } => "Function",
            SignalSource::Precomputed { .. } => "Precomputed",
        };
        f.debug_struct("SignalSource")
            .field("kind", &kind)
            .field("name", &self.name())
            .finish()
    }
}
