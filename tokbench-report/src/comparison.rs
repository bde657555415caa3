//! Comparison Aggregation
//!
//! Ratios are baseline over candidate: a speedup above 1.0 means the
//! candidate is faster, below 1.0 means it is slower.

use serde::{Deserialize, Serialize};
use tokbench_core::MeasurementResult;
use tokbench_stats::ratio;

/// Both implementations' figures for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Scenario name
    pub name: String,
    /// Scenario text length in characters
    pub text_length: usize,
    /// Implementation A
    pub baseline: MeasurementResult,
    /// Implementation B
    pub candidate: MeasurementResult,
    /// `baseline.encode_mean / candidate.encode_mean`, `None` if undefined
    pub encode_speedup: Option<f64>,
    /// `baseline.memory_used / candidate.memory_used`, `None` if undefined
    pub memory_improvement: Option<f64>,
}

impl ComparisonResult {
    /// Whether the two implementations disagree on the token count
    ///
    /// A data-consistency warning, not an error.
    pub fn token_count_mismatch(&self) -> bool {
        self.baseline.token_count != self.candidate.token_count
    }

    /// Whether the candidate figures were replayed rather than measured
    pub fn candidate_is_fixture(&self) -> bool {
        !self.candidate.provenance.is_live()
    }
}

/// Combine two measurements of the same scenario
pub fn compare(
    name: &str,
    text_length: usize,
    baseline: MeasurementResult,
    candidate: MeasurementResult,
) -> ComparisonResult {
    let encode_speedup = ratio(baseline.encode_mean, candidate.encode_mean);
    let memory_improvement = ratio(baseline.memory_used, candidate.memory_used);

    ComparisonResult {
        name: name.to_string(),
        text_length,
        baseline,
        candidate,
        encode_speedup,
        memory_improvement,
    }
}
