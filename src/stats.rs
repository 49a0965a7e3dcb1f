//! Robust summary statistics shared by the background-acid estimator and the
//! peak engine's noise thresholds.

/// Scale factor converting a median absolute deviation into a Gaussian
/// standard-deviation equivalent (MAD = 0.6745 σ ⇒ σ = 1.4826 MAD).
pub const MAD_SCALE: f64 = 1.4826;

/// Median of a slice. Sorts a copy; returns 0.0 for an empty slice.
///
/// Even-length inputs return the mean of the two middle values.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median absolute deviation of `values` around `center`.
pub fn median_abs_deviation(values: &[f64], center: f64) -> f64 {
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

/// Gaussian-equivalent noise level: `1.4826 × median(|x − median(x)|)`.
pub fn robust_sigma(values: &[f64]) -> f64 {
    let center = median(values);
    MAD_SCALE * median_abs_deviation(values, center)
}

/// First differences `x[i+1] - x[i]`.
pub fn diff(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}
