#![warn(missing_docs)]
//! tokbench Report - Comparison and Rendering
//!
//! Turns pairs of `MeasurementResult`s into a report:
//! - Comparison aggregation (encode speedup, memory ratio)
//! - Unit formatting (s / ms / μs, MiB/s)
//! - Markdown (document section), plain terminal and JSON output
//!
//! Renderers only consume the computed `Report`; swapping the output syntax
//! never touches the numbers.

mod comparison;
mod json;
mod render;
mod report;
mod units;

pub use comparison::{ComparisonResult, compare};
pub use json::generate_json_report;
pub use render::{MarkdownRenderer, PlainRenderer, ReportRenderer, TableRow, table_rows};
pub use report::{Report, ReportMeta, ReportSummary, RunParameters, SystemInfo};
pub use units::{
    format_memory, format_ratio, format_throughput, format_time, throughput_mib_per_sec,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown section suitable for splicing into a document
    Markdown,
    /// Human-readable terminal output
    Human,
    /// JSON with every measured field
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
