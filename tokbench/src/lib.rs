#![warn(missing_docs)]
//! # tokbench
//!
//! Side-by-side performance comparison of two tokenizer implementations.
//!
//! tokbench runs the same scenarios through both implementations and reports:
//! - **Latency**: mean, median and minimum encode/decode time per call
//! - **Throughput**: characters processed per second, in MiB/s
//! - **Memory**: resident-set growth across the encode and decode phases
//! - **Ratios**: encode speedup and memory improvement of the candidate over the baseline
//!
//! The result renders as a markdown section that can replace the
//! `## Performance` section of a README in place.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokbench::{MeasureParams, MeasurementEngine, ProcessMemory, TokenizerRegistry};
//!
//! let tokenizer = TokenizerRegistry::acquire("tiktoken-rs", "cl100k_base")?;
//! let engine = MeasurementEngine::new(tokenizer, Arc::new(ProcessMemory));
//! let result = engine.measure("Hello, world!", &MeasureParams::default())?;
//! println!("{} tokens, {:.1} μs", result.token_count, result.encode_mean * 1e6);
//! ```
//!
//! ## Recorded reference figures
//!
//! When the second implementation cannot run in this process, its figures can
//! be replayed from `[reference.fixture]` in `tokbench.toml`. Replayed rows
//! are marked as pre-recorded in every output format.

// Re-export core types
pub use tokbench_core::{
    BYTE_LEVEL, ByteLevelTokenizer, CoreError, FixtureFigures, FixtureProvider, FixtureTable,
    LiveProvider, MeasureParams, MeasurementEngine, MeasurementResult, MemorySampler,
    ProcessMemory, Provenance, RawMeasurement, ResultProvider, SHORT_TEXT_MAX_CHARS, Scenario,
    SizeBucket, TIKTOKEN, TIKTOKEN_ORDINARY, TiktokenTokenizer, Tokenizer, TokenizerRegistry,
};

// Re-export stats
pub use tokbench_stats::{DurationSummary, ratio, summarize};

// Re-export report types
pub use tokbench_report::{
    ComparisonResult, MarkdownRenderer, OutputFormat, PlainRenderer, Report, ReportMeta,
    ReportRenderer, ReportSummary, compare, format_memory, format_ratio, format_throughput,
    format_time, generate_json_report, throughput_mib_per_sec,
};

// Re-export configuration, patching and execution
pub use tokbench_cli::{
    Cli, ConfigError, Overrides, PatchError, RunConfig, ScenarioExecutor, TokbenchConfig,
    commit_patch, confirm, execute_run, patch_section, render_section,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        MeasureParams, MeasurementEngine, MemorySampler, ResultProvider, Scenario, Tokenizer,
        TokenizerRegistry, compare,
    };
}

/// Run the tokbench CLI.
///
/// ```ignore
/// fn main() {
///     tokbench::run().unwrap();
/// }
/// ```
pub use tokbench_cli::run;
