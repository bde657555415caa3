//! Report Data Structures

use crate::comparison::ComparisonResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokbench_stats::mean_of_defined;

/// Complete comparison report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Version, timestamp, system and run parameters
    pub meta: ReportMeta,
    /// Display label of implementation A
    pub baseline_label: String,
    /// Display label of implementation B
    pub candidate_label: String,
    /// One entry per scenario, in run order
    pub results: Vec<ComparisonResult>,
    /// Averages derived from `results`
    pub summary: ReportSummary,
}

impl Report {
    /// Assemble a report and derive its summary
    pub fn build(
        meta: ReportMeta,
        baseline_label: impl Into<String>,
        candidate_label: impl Into<String>,
        results: Vec<ComparisonResult>,
    ) -> Self {
        let summary = ReportSummary::from_results(&results);
        Self {
            meta,
            baseline_label: baseline_label.into(),
            candidate_label: candidate_label.into(),
            results,
            summary,
        }
    }

    /// Source note of the first fixture-backed candidate, if any
    pub fn fixture_source(&self) -> Option<&str> {
        self.results.iter().find_map(|r| match &r.candidate.provenance {
            tokbench_core::Provenance::Fixture { source } => Some(source.as_str()),
            tokbench_core::Provenance::Live => None,
        })
    }
}

/// Averages across all scenarios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of scenarios compared
    pub scenarios: usize,
    /// Mean of the defined encode speedups
    pub average_speedup: Option<f64>,
    /// Mean of the defined memory ratios
    pub average_memory_improvement: Option<f64>,
    /// Scenarios where the token counts disagree
    pub token_count_mismatches: usize,
}

impl ReportSummary {
    /// Derive the summary from per-scenario results
    pub fn from_results(results: &[ComparisonResult]) -> Self {
        Self {
            scenarios: results.len(),
            average_speedup: mean_of_defined(results.iter().map(|r| r.encode_speedup)),
            average_memory_improvement: mean_of_defined(
                results.iter().map(|r| r.memory_improvement),
            ),
            token_count_mismatches: results.iter().filter(|r| r.token_count_mismatch()).count(),
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// tokbench version that produced the report
    pub version: String,
    /// When the report was built
    pub timestamp: DateTime<Utc>,
    /// Machine the live figures were measured on
    pub system: SystemInfo,
    /// Encoding and iteration counts
    pub parameters: RunParameters,
}

/// Run parameters captured in report metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParameters {
    /// Encoding id used by both implementations
    pub encoding: String,
    /// Timed iterations per phase
    pub iterations: usize,
    /// Untimed warmup passes
    pub warmup_iterations: usize,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name, "Unknown" when unavailable
    pub cpu: String,
    /// Available parallelism
    pub cpu_cores: u32,
}
