/// Replaces every NaN with the most recent earlier non-NaN value.
///
/// Values are only ever carried forward in time. Leading NaNs, which have no earlier
/// value, are left undefined.
pub fn forward_fill(values: &mut [f64]) {
    let mut last = f64::NAN;
    for value in values.iter_mut() {
        if value.is_nan() {
            *value = last;
        } else {
            last = *value;
        }
    }
}

/// Replaces every NaN with `default`.
pub fn fill_undefined(values: &mut [f64], default: f64) {
    for value in values.iter_mut().filter(|v| v.is_nan()) {
        *value = default;
    }
}
