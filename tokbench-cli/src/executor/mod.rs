//! Comparison Executor
//!
//! Runs every planned scenario against both implementations and collects
//! the comparisons.
//!
//! ## Pipeline Overview
//!
//! ```text
//! RunConfig (tokbench.toml + CLI overrides)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  providers  │  Acquire tokenizers, pick live/fixture reference
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  execution  │  Baseline then reference, per scenario, in order
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  metadata   │  Version, timestamp, system info for the report
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`providers`] - Provider composition from the run configuration
//! - [`execution`] - Sequential scenario execution with progress output
//! - [`metadata`] - System metadata collection

mod execution;
mod metadata;
mod providers;

pub use execution::ScenarioExecutor;
pub use metadata::build_report_meta;
pub use providers::{Providers, build_providers};

use crate::config::RunConfig;
use std::sync::Arc;
use tokbench_core::{CoreError, MemorySampler, ResultProvider, Scenario};
use tokbench_report::Report;

/// Measure `scenarios` with the providers described by `run` and build the report
///
/// Tokenizer acquisition happens before any scenario runs, so an unavailable
/// implementation fails fast without partial output.
pub fn execute_run(
    run: &RunConfig,
    scenarios: &[Scenario],
    sampler: Arc<dyn MemorySampler>,
    show_progress: bool,
) -> Result<Report, CoreError> {
    let providers = build_providers(run, sampler)?;

    let mut executor = ScenarioExecutor::new(run.params);
    if !show_progress {
        executor = executor.quiet();
    }
    let results = executor.execute(&providers.baseline, providers.reference.as_ref(), scenarios)?;

    Ok(Report::build(
        build_report_meta(run),
        providers.baseline.label(),
        providers.reference.label(),
        results,
    ))
}
