//! Serializable strategy selection and construction.

use serde::{Deserialize, Serialize};

use super::{
    AdxTrend, BollingerBands, BuyAndHold, DcaFrequency, DollarCostAveraging, MacdCrossover,
    MeanReversion, Momentum, RsiReversal, SmaCrossover, StochasticOscillator, VwapReversion,
};
use crate::signal::{Strategy, StrategyError};

/// A bundled strategy plus its parameters.
///
/// Deserializes from a table tagged by `type`; omitted fields take the
/// defaults used by the standard study roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategySpec {
    SmaCrossover {
        #[serde(default = "defaults::sma_short")]
        short_window: usize,
        #[serde(default = "defaults::sma_long")]
        long_window: usize,
    },
    Momentum {
        #[serde(default = "defaults::momentum_short")]
        short_window: usize,
        #[serde(default = "defaults::momentum_long")]
        long_window: usize,
    },
    BollingerBands {
        #[serde(default = "defaults::window")]
        window: usize,
        #[serde(default = "defaults::num_std")]
        num_std: f64,
    },
    Rsi {
        #[serde(default = "defaults::rsi_period")]
        period: usize,
        #[serde(default = "defaults::rsi_oversold")]
        oversold: f64,
        #[serde(default = "defaults::rsi_overbought")]
        overbought: f64,
    },
    Macd {
        #[serde(default = "defaults::macd_fast")]
        fast: usize,
        #[serde(default = "defaults::macd_slow")]
        slow: usize,
        #[serde(default = "defaults::macd_signal")]
        signal: usize,
    },
    Stochastic {
        #[serde(default = "defaults::stoch_k")]
        k_period: usize,
        #[serde(default = "defaults::stoch_d")]
        d_period: usize,
        #[serde(default = "defaults::stoch_oversold")]
        oversold: f64,
        #[serde(default = "defaults::stoch_overbought")]
        overbought: f64,
    },
    AdxTrend {
        #[serde(default = "defaults::adx_period")]
        period: usize,
        #[serde(default = "defaults::adx_threshold")]
        threshold: f64,
    },
    Vwap {
        #[serde(default = "defaults::window")]
        lookback: usize,
        #[serde(default = "defaults::vwap_threshold")]
        threshold: f64,
    },
    MeanReversion {
        #[serde(default = "defaults::window")]
        window: usize,
        #[serde(default = "defaults::z_entry")]
        z_entry: f64,
        #[serde(default = "defaults::z_exit")]
        z_exit: f64,
    },
    Dca {
        #[serde(default)]
        frequency: DcaFrequency,
    },
    BuyAndHold,
}

mod defaults {
    pub fn sma_short() -> usize {
        20
    }
    pub fn sma_long() -> usize {
        50
    }
    pub fn momentum_short() -> usize {
        10
    }
    pub fn momentum_long() -> usize {
        30
    }
    pub fn window() -> usize {
        20
    }
    pub fn num_std() -> f64 {
        2.0
    }
    pub fn rsi_period() -> usize {
        14
    }
    pub fn rsi_oversold() -> f64 {
        30.0
    }
    pub fn rsi_overbought() -> f64 {
        70.0
    }
    pub fn macd_fast() -> usize {
        12
    }
    pub fn macd_slow() -> usize {
        26
    }
    pub fn macd_signal() -> usize {
        9
    }
    pub fn stoch_k() -> usize {
        14
    }
    pub fn stoch_d() -> usize {
        3
    }
    pub fn stoch_oversold() -> f64 {
        20.0
    }
    pub fn stoch_overbought() -> f64 {
        80.0
    }
    pub fn adx_period() -> usize {
        14
    }
    pub fn adx_threshold() -> f64 {
        25.0
    }
    pub fn vwap_threshold() -> f64 {
        0.02
    }
    pub fn z_entry() -> f64 {
        -1.0
    }
    pub fn z_exit() -> f64 {
        -0.1
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> StrategyError {
    StrategyError::InvalidParameter {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn require_window(name: &str, value: usize, min: usize) -> Result<(), StrategyError> {
    if value < min {
        return Err(invalid(name, format!("must be >= {min}, got {value}")));
    }
    Ok(())
}

fn require_ordered(lo: &str, lo_value: f64, hi: &str, hi_value: f64) -> Result<(), StrategyError> {
    if lo_value.is_nan() || hi_value.is_nan() || lo_value >= hi_value {
        return Err(invalid(lo, format!("must be < {hi} ({lo_value} >= {hi_value})")));
    }
    Ok(())
}

fn require_level(name: &str, value: f64) -> Result<(), StrategyError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(name, format!("must be within [0, 100], got {value}")));
    }
    Ok(())
}

fn require_positive(name: &str, value: f64) -> Result<(), StrategyError> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(invalid(name, format!("must be a positive number, got {value}")));
    }
    Ok(())
}

impl StrategySpec {
    /// Stable identifier, identical to the serde `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            StrategySpec::SmaCrossover { .. } => "sma_crossover",
            StrategySpec::Momentum { .. } => "momentum",
            StrategySpec::BollingerBands { .. } => "bollinger_bands",
            StrategySpec::Rsi { .. } => "rsi",
            StrategySpec::Macd { .. } => "macd",
            StrategySpec::Stochastic { .. } => "stochastic",
            StrategySpec::AdxTrend { .. } => "adx_trend",
            StrategySpec::Vwap { .. } => "vwap",
            StrategySpec::MeanReversion { .. } => "mean_reversion",
            StrategySpec::Dca { .. } => "dca",
            StrategySpec::BuyAndHold => "buy_and_hold",
        }
    }

    /// Display label used in reports.
    pub fn label(&self) -> String {
        match self {
            StrategySpec::SmaCrossover {
                short_window,
                long_window,
            } => format!("SMA Crossover ({short_window}/{long_window})"),
            StrategySpec::Momentum {
                short_window,
                long_window,
            } => format!("Momentum ({short_window}/{long_window})"),
            StrategySpec::BollingerBands { window, num_std } => {
                format!("Bollinger Bands ({window}, {num_std}σ)")
            }
            StrategySpec::Rsi {
                period,
                oversold,
                overbought,
            } => format!("RSI ({period}, {oversold}/{overbought})"),
            StrategySpec::Macd { fast, slow, signal } => {
                format!("MACD ({fast}/{slow}/{signal})")
            }
            StrategySpec::Stochastic {
                k_period, d_period, ..
            } => format!("Stochastic Oscillator ({k_period}/{d_period})"),
            StrategySpec::AdxTrend { period, threshold } => {
                format!("ADX Trend ({period}, >{threshold})")
            }
            StrategySpec::Vwap {
                lookback,
                threshold,
            } => format!("VWAP ({lookback}, {:.1}%)", threshold * 100.0),
            StrategySpec::MeanReversion {
                window,
                z_entry,
                z_exit,
            } => format!("Mean Reversion ({window}, z {z_entry}/{z_exit})"),
            StrategySpec::Dca { frequency } => {
                format!("Dollar-Cost Averaging ({})", frequency.as_str())
            }
            StrategySpec::BuyAndHold => "[BENCHMARK] Buy & Hold".to_string(),
        }
    }

    /// Check parameters without constructing the strategy.
    pub fn validate(&self) -> Result<(), StrategyError> {
        match *self {
            StrategySpec::SmaCrossover {
                short_window,
                long_window,
            }
            | StrategySpec::Momentum {
                short_window,
                long_window,
            } => {
                require_window("short_window", short_window, 1)?;
                if short_window >= long_window {
                    return Err(invalid(
                        "short_window",
                        format!("must be < long_window ({short_window} >= {long_window})"),
                    ));
                }
                Ok(())
            }
            StrategySpec::BollingerBands { window, num_std } => {
                require_window("window", window, 2)?;
                require_positive("num_std", num_std)
            }
            StrategySpec::Rsi {
                period,
                oversold,
                overbought,
            } => {
                require_window("period", period, 1)?;
                require_level("oversold", oversold)?;
                require_level("overbought", overbought)?;
                require_ordered("oversold", oversold, "overbought", overbought)
            }
            StrategySpec::Macd { fast, slow, signal } => {
                require_window("fast", fast, 1)?;
                require_window("signal", signal, 1)?;
                if fast >= slow {
                    return Err(invalid("fast", format!("must be < slow ({fast} >= {slow})")));
                }
                Ok(())
            }
            StrategySpec::Stochastic {
                k_period,
                d_period,
                oversold,
                overbought,
            } => {
                require_window("k_period", k_period, 1)?;
                require_window("d_period", d_period, 1)?;
                require_level("oversold", oversold)?;
                require_level("overbought", overbought)?;
                require_ordered("oversold", oversold, "overbought", overbought)
            }
            StrategySpec::AdxTrend { period, threshold } => {
                require_window("period", period, 1)?;
                require_level("threshold", threshold)
            }
            StrategySpec::Vwap {
                lookback,
                threshold,
            } => {
                require_window("lookback", lookback, 1)?;
                require_positive("threshold", threshold)
            }
            StrategySpec::MeanReversion {
                window,
                z_entry,
                z_exit,
            } => {
                require_window("window", window, 2)?;
                require_ordered("z_entry", z_entry, "z_exit", z_exit)
            }
            StrategySpec::Dca { .. } | StrategySpec::BuyAndHold => Ok(()),
        }
    }

    /// Validate, then construct the strategy.
    pub fn build(&self) -> Result<Box<dyn Strategy>, StrategyError> {
        self.validate()?;
        let strategy: Box<dyn Strategy> = match *self {
            StrategySpec::SmaCrossover {
                short_window,
                long_window,
            } => Box::new(SmaCrossover::new(short_window, long_window)),
            StrategySpec::Momentum {
                short_window,
                long_window,
            } => Box::new(Momentum::new(short_window, long_window)),
            StrategySpec::BollingerBands { window, num_std } => {
                Box::new(BollingerBands::new(window, num_std))
            }
            StrategySpec::Rsi {
                period,
                oversold,
                overbought,
            } => Box::new(RsiReversal::new(period, oversold, overbought)),
            StrategySpec::Macd { fast, slow, signal } => {
                Box::new(MacdCrossover::new(fast, slow, signal))
            }
            StrategySpec::Stochastic {
                k_period,
                d_period,
                oversold,
                overbought,
            } => Box::new(StochasticOscillator::new(
                k_period, d_period, oversold, overbought,
            )),
            StrategySpec::AdxTrend { period, threshold } => {
                Box::new(AdxTrend::new(period, threshold))
            }
            StrategySpec::Vwap {
                lookback,
                threshold,
            } => Box::new(VwapReversion::new(lookback, threshold)),
            StrategySpec::MeanReversion {
                window,
                z_entry,
                z_exit,
            } => Box::new(MeanReversion::new(window, z_entry, z_exit)),
            StrategySpec::Dca { frequency } => Box::new(DollarCostAveraging::new(frequency)),
            StrategySpec::BuyAndHold => Box::new(BuyAndHold),
        };
        Ok(strategy)
    }

    /// Every bundled strategy with default parameters.
    pub fn all_defaults() -> Vec<StrategySpec> {
        let mut all = Self::roster();
        all.push(StrategySpec::AdxTrend {
            period: defaults::adx_period(),
            threshold: defaults::adx_threshold(),
        });
        all.push(StrategySpec::MeanReversion {
            window: defaults::window(),
            z_entry: defaults::z_entry(),
            z_exit: defaults::z_exit(),
        });
        all
    }

    /// The standard multi-year study line-up, benchmark first.
    pub fn roster() -> Vec<StrategySpec> {
        vec![
            StrategySpec::BuyAndHold,
            StrategySpec::SmaCrossover {
                short_window: defaults::sma_short(),
                long_window: defaults::sma_long(),
            },
            StrategySpec::Momentum {
                short_window: defaults::momentum_short(),
                long_window: defaults::momentum_long(),
            },
            StrategySpec::BollingerBands {
                window: defaults::window(),
                num_std: defaults::num_std(),
            },
            StrategySpec::Rsi {
                period: defaults::rsi_period(),
                oversold: defaults::rsi_oversold(),
                overbought: defaults::rsi_overbought(),
            },
            StrategySpec::Macd {
                fast: defaults::macd_fast(),
                slow: defaults::macd_slow(),
                signal: defaults::macd_signal(),
            },
            StrategySpec::Stochastic {
                k_period: defaults::stoch_k(),
                d_period: defaults::stoch_d(),
                oversold: defaults::stoch_oversold(),
                overbought: defaults::stoch_overbought(),
            },
            StrategySpec::Vwap {
                lookback: defaults::window(),
                threshold: defaults::vwap_threshold(),
            },
            StrategySpec::Dca {
                frequency: DcaFrequency::Monthly,
            },
        ]
    }

    /// Default-parameter spec for a `type` tag, e.g. `"macd"`.
    pub fn from_kind(kind: &str) -> Option<StrategySpec> {
        Self::all_defaults()
            .into_iter()
            .find(|spec| spec.kind() == kind)
    }
}
