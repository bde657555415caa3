#![warn(missing_docs)]
//! tokbench Statistics
//!
//! Small, deterministic statistics for timing runs:
//! - Mean, median, min and max of a duration sequence
//! - Linear-interpolated percentiles
//! - Guarded ratios that surface division by zero instead of producing infinity

mod percentiles;
mod ratio;
mod summary;

pub use percentiles::compute_percentile;
pub use ratio::{mean_of_defined, ratio};
pub use summary::{DurationSummary, summarize};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let summary = summarize(&[2.0, 4.0]);
        assert_eq!(ratio(summary.mean, summary.min), Some(1.5));
    }
}
