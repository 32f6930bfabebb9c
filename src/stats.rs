/// Median of a slice. Non-finite entries are dropped so they cannot break the
/// ordering; an even-length slice averages the two middle values. Returns NaN
/// when nothing finite remains.
pub fn median(data: &[f64]) -> f64 {
    let mut values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) * 0.5
    } else {
        values[mid]
    }
}

pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation (divide by N, not N-1).
pub fn population_std(data: &[f64], mean: f64) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let variance = data.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

/// Power to decibels, `10 * log10(power)`. Non-positive power has no defined
/// dB value and maps to NaN; NaN never satisfies a deviation threshold.
pub fn db10(power: f64) -> f64 {
    if power > 0.0 {
        10.0 * power.log10()
    } else {
        f64::NAN
    }
}
