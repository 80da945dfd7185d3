//! Carry-forward position fold shared by the stateful strategies.

/// Fold per-bar enter/exit conditions into a 0/1 signal.
///
/// `conditions(i)` returns `(enter, exit)` for bar `i`. Bar 0 is always flat
/// since no crossing can be observed there. Enter wins when both fire; when
/// neither fires the previous state carries forward.
pub(crate) fn carry_forward<F>(n: usize, mut conditions: F) -> Vec<f64>
where
    F: FnMut(usize) -> (bool, bool),
{
    let mut signal = vec![0.0; n];
    let mut position = 0.0;
    for (i, slot) in signal.iter_mut().enumerate().skip(1) {
        let (enter, exit) = conditions(i);
        if enter {
            position = 1.0;
        } else if exit {
            position = 0.0;
        }
        *slot = position;
    }
    signal
}

/// `a` moved from at-or-below `b` to strictly above it at bar `i` (i >= 1).
/// Any NaN operand makes this false.
pub(crate) fn crossed_above(a: &[f64], b: &[f64], i: usize) -> bool {
    a[i] > b[i] && a[i - 1] <= b[i - 1]
}

/// `a` moved from at-or-above `b` to strictly below it at bar `i` (i >= 1).
pub(crate) fn crossed_below(a: &[f64], b: &[f64], i: usize) -> bool {
    a[i] < b[i] && a[i - 1] >= b[i - 1]
}

/// `values` moved from at-or-below `level` to strictly above it.
pub(crate) fn rose_through(values: &[f64], level: f64, i: usize) -> bool {
    values[i] > level && values[i - 1] <= level
}

/// `values` moved from at-or-above `level` to strictly below it.
pub(crate) fn fell_through(values: &[f64], level: f64, i: usize) -> bool {
    values[i] < level && values[i - 1] >= level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_state_until_exit() {
        let enter = [false, true, false, false, false];
        let exit = [false, false, false, true, false];
        let s = carry_forward(5, |i| (enter[i], exit[i]));
        assert_eq!(s, vec![0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn enter_wins_over_exit() {
        let s = carry_forward(3, |_| (true, true));
        assert_eq!(s, vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn bar_zero_is_never_evaluated() {
        let mut seen = Vec::new();
        let s = carry_forward(3, |i| {
            seen.push(i);
            (false, false)
        });
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(s, vec![0.0; 3]);
    }

    #[test]
    fn crossings_ignore_nan() {
        let a = [f64::NAN, 2.0, 0.0];
        let b = [1.0, 1.0, 1.0];
        assert!(!crossed_above(&a, &b, 1));
        assert!(crossed_below(&a, &b, 2));
        assert!(!rose_through(&a, 1.0, 1));
        assert!(fell_through(&a, 1.0, 2));
    }
}
