/// Grid and interpolation helpers shared by the envelope table.

/// Linear interpolation on a linear scale.
///
/// Given arrays of x and y values, interpolate to find the y value at x_new.
/// If x_new is outside the range of x, returns the first or last y value —
/// flat extrapolation, so a tabulated bound is never tightened beyond the
/// nearest known-valid entry.
pub fn interpolate_linear(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    // Edge cases
    if x.is_empty() {
        return f64::NAN;
    }
    if x.len() == 1 {
        return y[0];
    }
    if x_new <= x[0] {
        return y[0];
    }
    if x_new >= x[x.len() - 1] {
        return y[y.len() - 1];
    }

    // Binary search for interval: find largest i with x[i] <= x_new
    let mut low = 0usize;
    let mut high = x.len() - 1; // invariant: target interval within (low, high]
    while high - low > 1 {
        let mid = (low + high) >> 1;
        if x[mid] <= x_new {
            low = mid;
        } else {
            high = mid;
        }
    }
    let idx = low; // x[idx] <= x_new < x[idx+1]
    let x1 = x[idx];
    let x2 = x[idx + 1];
    let y1 = y[idx];
    let y2 = y[idx + 1];
    y1 + (x_new - x1) * (y2 - y1) / (x2 - x1)
}

/// n equally spaced values covering [start, stop] inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// n log-spaced values covering [10^log10_start, 10^log10_stop] inclusive.
pub fn logspace(log10_start: f64, log10_stop: f64, n: usize) -> Vec<f64> {
    linspace(log10_start, log10_stop, n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}
