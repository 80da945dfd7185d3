//! Rolling-window and recursive primitives over plain `f64` slices.
//!
//! Window functions require a full window: the first `window - 1` outputs are
//! NaN, and any NaN inside a window makes that output NaN.

/// Rolling arithmetic mean.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_sum(values, window)
        .into_iter()
        .map(|s| s / window as f64)
        .collect()
}

/// Rolling sum. Tracks NaN count so a NaN only poisons the windows that contain it.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "window must be >= 1");
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    let mut sum = 0.0;
    let mut nan_count = 0usize;

    for i in 0..n {
        let entering = values[i];
        if entering.is_nan() {
            nan_count += 1;
        } else {
            sum += entering;
        }
        if i >= window {
            let leaving = values[i - window];
            if leaving.is_nan() {
                nan_count -= 1;
            } else {
                sum -= leaving;
            }
        }
        if i + 1 >= window && nan_count == 0 {
            out[i] = sum;
        }
    }
    out
}

/// Rolling sample standard deviation (ddof = 1). A window of 1 is always NaN.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "window must be >= 1");
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window < 2 {
        return out;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = var.sqrt();
    }
    out
}

/// Rolling minimum.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, f64::min)
}

/// Rolling maximum.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, f64::max)
}

fn rolling_extreme(values: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<f64> {
    assert!(window >= 1, "window must be >= 1");
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    for i in window.saturating_sub(1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = slice.iter().copied().fold(slice[0], pick);
    }
    out
}

/// Exponentially weighted mean with span-based decay and adjusted weights.
///
/// alpha = 2 / (span + 1). Output at t is the weighted average of all
/// observations so far with weight (1 - alpha)^age, so it is defined from
/// the first valid observation. NaN observations add no weight but still age
/// the existing weights; the output there repeats the current average.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    assert!(span >= 1, "span must be >= 1");
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut out = vec![f64::NAN; values.len()];
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &v) in values.iter().enumerate() {
        numerator *= decay;
        denominator *= decay;
        if !v.is_nan() {
            numerator += v;
            denominator += 1.0;
        }
        if denominator > 0.0 {
            out[i] = numerator / denominator;
        }
    }
    out
}

/// Percent change over `periods` observations: v[t] / v[t - periods] - 1.
pub fn pct_change(values: &[f64], periods: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    for i in periods..n {
        out[i] = values[i] / values[i - periods] - 1.0;
    }
    out
}

/// First difference: v[t] - v[t - 1], NaN at index 0.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    for i in 1..n {
        out[i] = values[i] - values[i - 1];
    }
    out
}

/// Replace NaN with `fill`.
pub fn fill_nan(values: &[f64], fill: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v.is_nan() { fill } else { v })
        .collect()
}

/// Forward-fill NaN with the last valid value. Leading NaNs stay NaN.
pub fn forward_fill(values: &[f64]) -> Vec<f64> {
    let mut last = f64::NAN;
    values
        .iter()
        .map(|&v| {
            if !v.is_nan() {
                last = v;
            }
            last
        })
        .collect()
}
