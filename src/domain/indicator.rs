//! Rolling calculations over a close-price series.
//!
//! O(n) sliding-window sums. Warmup slots (before a window has filled) are
//! `None`; there is no partial-window averaging.

/// Simple moving average over a trailing window of exactly `window` values.
///
/// The first `window - 1` slots are `None`. A `window` of 0 yields all
/// `None`, as does a window longer than the input.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut window_sum = 0.0;

    for (i, &value) in values.iter().enumerate() {
        window_sum += value;
        if i >= window {
            window_sum -= values[i - window];
        }

        if i >= window - 1 {
            out.push(Some(window_sum / window as f64));
        } else {
            out.push(None);
        }
    }

    out
}

/// First difference of a series: `out[i] = values[i] - values[i-1]`.
///
/// `None` wherever either operand is `None`, and always at index 0.
pub fn first_difference(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if i == 0 {
                return None;
            }
            match (values[i - 1], value) {
                (Some(prev), Some(curr)) => Some(curr - prev),
                _ => None,
            }
        })
        .collect()
}
