//! Summary Statistics
//!
//! Mean, median and extremes over the raw samples. Every sample counts; there
//! is no outlier rejection.

use crate::percentiles::compute_percentile;
use serde::{Deserialize, Serialize};

/// Summary of one duration sequence, in the unit of the input (seconds for tokbench)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DurationSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// Median (linear interpolation on even counts)
    pub median: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Number of samples summarised
    pub count: usize,
}

/// Summarise a sequence of samples
///
/// An empty sequence yields an all-zero summary with `count == 0`.
pub fn summarize(samples: &[f64]) -> DurationSummary {
    if samples.is_empty() {
        return DurationSummary::default();
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let median = compute_percentile(samples, 50.0);

    let min = samples
        .iter()
        .cloned()
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(0.0);
    let max = samples
        .iter()
        .cloned()
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(0.0);

    DurationSummary {
        mean,
        median,
        min,
        max,
        count: samples.len(),
    }
}
