//! Window primitives shared by the calculators.
//!
//! All functions treat `NaN` as "undefined". A window at row `i` spans rows
//! `i + 1 - window ..= i`, clipped at the start of the series, so no value from a
//! later row ever contributes to an earlier one.

/// `values` lagged by `lag` rows. The first `lag` rows are undefined.
pub fn shift(values: &[f64], lag: usize) -> Vec<f64> {
    (0..values.len())
        .map(|row| if row < lag { f64::NAN } else { values[row - lag] })
        .collect()
}

/// Arithmetic mean of the defined values, `NaN` if there are none.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

/// Sample standard deviation (ddof = 1) of the defined values, `NaN` with fewer than two.
pub fn sample_std(values: &[f64]) -> f64 {
    let defined: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if defined.len() < 2 {
        return f64::NAN;
    }
    let m = defined.iter().sum::<f64>() / defined.len() as f64;
    let sum_sq: f64 = defined.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (defined.len() - 1) as f64).sqrt()
}

/// `numerator / denominator`, undefined when the denominator is zero or not finite.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if numerator.is_nan() || denominator == 0.0 || !denominator.is_finite() {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Rolling mean over up to `window` rows.
///
/// A row is defined once its window holds at least `max(min_periods, 1)` defined values.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    rolling(values, window, min_periods.max(1), mean)
}

/// Rolling sample standard deviation over up to `window` rows.
///
/// A row is defined once its window holds at least `max(min_periods, 2)` defined values.
pub fn rolling_std(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    rolling(values, window, min_periods.max(2), sample_std)
}

/// Applies `f` to every full window of `window` consecutive rows.
///
/// The first `window - 1` rows, and any row whose window contains an undefined
/// value, are undefined.
pub fn rolling_apply<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let window = window.max(1);
    (0..values.len())
        .map(|row| {
            if row + 1 < window {
                return f64::NAN;
            }
            let slice = &values[row + 1 - window..=row];
            if slice.iter().any(|v| v.is_nan()) {
                f64::NAN
            } else {
                f(slice)
            }
        })
        .collect()
}

fn rolling<F>(values: &[f64], window: usize, required: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let window = window.max(1);
    (0..values.len())
        .map(|row| {
            let slice = &values[(row + 1).saturating_sub(window)..=row];
            let defined = slice.iter().filter(|v| !v.is_nan()).count();
            if defined < required { f64::NAN } else { f(slice) }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn shift_lags_and_pads() {
        let lagged = shift(&[1.0, 2.0, 3.0, 4.0], 2);
        assert!(lagged[0].is_nan() && lagged[1].is_nan());
        assert_eq!(&lagged[2..], &[1.0, 2.0]);

        assert!(shift(&[1.0, 2.0], 5).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // Mean 5, squared deviations sum to 32, 32 / 7.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_close(sample_std(&values), (32.0_f64 / 7.0).sqrt());
        assert!(sample_std(&[1.0]).is_nan());
        assert!(sample_std(&[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn ratio_is_undefined_for_degenerate_denominators() {
        assert_close(ratio(1.0, 4.0), 0.25);
        assert!(ratio(1.0, 0.0).is_nan());
        assert!(ratio(0.0, 0.0).is_nan());
        assert!(ratio(1.0, f64::NAN).is_nan());
        assert!(ratio(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn rolling_mean_with_zero_min_periods_uses_available_history() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3, 0);
        assert_eq!(means, vec![1.0, 1.5, 2.0, 3.0]);
    }

    #[test]
    fn rolling_mean_skips_undefined_values() {
        let means = rolling_mean(&[f64::NAN, 2.0, f64::NAN, 4.0], 2, 0);
        assert!(means[0].is_nan());
        assert_eq!(&means[1..], &[2.0, 2.0, 4.0]);
    }

    #[test]
    fn rolling_std_needs_two_observations() {
        let stds = rolling_std(&[1.0, 3.0, 5.0, 5.0], 2, 0);
        assert!(stds[0].is_nan());
        assert_close(stds[1], 2.0_f64.sqrt());
        assert_close(stds[2], 2.0_f64.sqrt());
        assert_close(stds[3], 0.0);
    }

    #[test]
    fn rolling_apply_requires_full_clean_windows() {
        let sums = rolling_apply(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0], 2, |w| w.iter().sum());
        assert!(sums[0].is_nan());
        assert_eq!(sums[1], 3.0);
        assert!(sums[2].is_nan());
        assert!(sums[3].is_nan());
        assert_eq!(&sums[4..], &[9.0, 11.0]);
    }

    #[test]
    fn windows_never_look_ahead() {
        let mut values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let before = rolling_mean(&values, 3, 0);
        values[4] = 1_000.0;
        let after = rolling_mean(&values, 3, 0);
        assert_eq!(&before[..4], &after[..4]);
    }
}
