//! Percentile Computation

/// Compute a single percentile from samples
///
/// Uses linear interpolation between nearest ranks, so the 50th percentile of
/// an even-length sequence is the mean of the two middle values.
///
/// # Examples
///
/// ```
/// # use tokbench_stats::compute_percentile;
/// let samples = vec![1.0, 2.0, 3.0, 4.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 2.5);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let p = percentile.clamp(0.0, 100.0) / 100.0;

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}
