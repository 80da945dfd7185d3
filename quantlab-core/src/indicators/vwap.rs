//! Rolling Volume-Weighted Average Price (VWAP).
//!
//! typical = (high + low + close) / 3
//! VWAP = rolling_sum(typical * volume) / rolling_sum(volume)
//!
//! Bars without volume count as NaN. A window with zero total volume has no
//! VWAP. Lookback: period - 1.

use super::rolling::rolling_sum;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Vwap {
    period: usize,
    name: String,
}

impl Vwap {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "VWAP period must be >= 1");
        Self {
            period,
            name: format!("vwap_{period}"),
        }
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let volume: Vec<f64> = bars.iter().map(|b| b.volume.unwrap_or(f64::NAN)).collect();
        let weighted: Vec<f64> = bars
            .iter()
            .zip(volume.iter())
            .map(|(b, v)| (b.high + b.low + b.close) / 3.0 * v)
            .collect();

        let num = rolling_sum(&weighted, self.period);
        let den = rolling_sum(&volume, self.period);
        num.iter()
            .zip(den.iter())
            .map(|(n, d)| if *d == 0.0 { f64::NAN } else { n / d })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn vwap_weights_by_volume() {
        let mut bars = make_bars(&[10.0, 20.0]);
        for b in bars.iter_mut() {
            b.high = b.close;
            b.low = b.close;
        }
        bars[0].volume = Some(3.0);
        bars[1].volume = Some(1.0);
        let result = Vwap::new(2).compute(&bars);
        assert!(result[0].is_nan());
        assert_approx(result[1], (30.0 + 20.0) / 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_volume_window_is_nan() {
        let mut bars = make_bars(&[10.0, 11.0]);
        for b in bars.iter_mut() {
            b.volume = Some(0.0);
        }
        assert!(Vwap::new(2).compute(&bars)[1].is_nan());
    }

    #[test]
    fn missing_volume_is_nan() {
        let mut bars = make_bars(&[10.0, 11.0]);
        bars[1].volume = None;
        assert!(Vwap::new(1).compute(&bars)[1].is_nan());
    }
}
