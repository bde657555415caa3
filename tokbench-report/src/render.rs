//! Report Rendering
//!
//! `table_rows` flattens a report into display cells once; each renderer
//! only decides the syntax around them.

use crate::comparison::ComparisonResult;
use crate::report::Report;
use crate::units::{format_memory, format_ratio, format_throughput, format_time};

/// Renders a report into text
pub trait ReportRenderer {
    /// Render the full report
    fn render(&self, report: &Report) -> String;
}

/// One displayed row: one implementation encoding one scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Implementation label
    pub implementation: String,
    /// Operation description, e.g. "Encode short text"
    pub operation: String,
    /// Mean encode time
    pub time: String,
    /// Encode throughput
    pub throughput: String,
    /// Memory used
    pub memory: String,
    /// Speed relative to the baseline
    pub relative: String,
    /// Whether the row is implementation B
    pub is_candidate: bool,
    /// Whether the figures were replayed from a fixture
    pub is_fixture: bool,
}

/// Two rows per comparison: baseline first (always `1.0x`), then candidate
pub fn table_rows(report: &Report) -> Vec<TableRow> {
    report
        .results
        .iter()
        .flat_map(|result| {
            let operation = operation_label(result);
            let baseline = &result.baseline;
            let candidate = &result.candidate;

            [
                TableRow {
                    implementation: report.baseline_label.clone(),
                    operation: operation.clone(),
                    time: format_time(baseline.encode_mean),
                    throughput: format_throughput(result.text_length, baseline.encode_mean),
                    memory: format_memory(baseline.memory_used),
                    relative: "1.0x".to_string(),
                    is_candidate: false,
                    is_fixture: !baseline.provenance.is_live(),
                },
                TableRow {
                    implementation: report.candidate_label.clone(),
                    operation,
                    time: format_time(candidate.encode_mean),
                    throughput: format_throughput(result.text_length, candidate.encode_mean),
                    memory: format_memory(candidate.memory_used),
                    relative: format_ratio(result.encode_speedup),
                    is_candidate: true,
                    is_fixture: result.candidate_is_fixture(),
                },
            ]
        })
        .collect()
}

/// "Encode <first word of the scenario name> text", e.g. "Short text" -> "Encode short text"
fn operation_label(result: &ComparisonResult) -> String {
    let scenario = result.name.split_whitespace().next().unwrap_or("");
    format!("Encode {} text", scenario.to_lowercase())
}

fn summary_sentence(report: &Report) -> String {
    format!(
        "Average across {} scenario(s): {} encode speedup and {} memory improvement for {} vs {}.",
        report.summary.scenarios,
        format_ratio(report.summary.average_speedup),
        format_ratio(report.summary.average_memory_improvement),
        report.candidate_label,
        report.baseline_label,
    )
}

const FIXTURE_MARK: &str = "†";

/// Markdown section for splicing into a document
///
/// The first line is `heading`, which should equal the start marker used
/// when patching so the section can be replaced again on the next run.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Section heading, e.g. "## Performance"
    pub heading: String,
    /// Sentence under the heading; a default naming both labels is used when `None`
    pub intro: Option<String>,
}

impl MarkdownRenderer {
    /// Create a renderer with the given heading and default intro
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            intro: None,
        }
    }

    /// Override the intro sentence
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new("## Performance")
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> String {
        let intro = self.intro.clone().unwrap_or_else(|| {
            format!(
                "Benchmarks comparing {} vs {} ({}, {} iterations, {} warmup):",
                report.candidate_label,
                report.baseline_label,
                report.meta.parameters.encoding,
                report.meta.parameters.iterations,
                report.meta.parameters.warmup_iterations,
            )
        });

        let headers = [
            "Implementation".to_string(),
            "Operation".to_string(),
            "Time".to_string(),
            "Throughput".to_string(),
            "Memory".to_string(),
            format!("vs {}", report.baseline_label),
        ];

        let cells: Vec<[String; 6]> = table_rows(report)
            .into_iter()
            .map(|row| {
                let implementation = if row.is_fixture {
                    format!("{}{}", row.implementation, FIXTURE_MARK)
                } else {
                    row.implementation
                };
                let relative = if row.is_candidate && row.relative != "n/a" {
                    format!("**{}**", row.relative)
                } else {
                    row.relative
                };
                [
                    implementation,
                    row.operation,
                    row.time,
                    row.throughput,
                    row.memory,
                    relative,
                ]
            })
            .collect();

        let widths: Vec<usize> = (0..headers.len())
            .map(|col| {
                cells
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(headers[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = vec![self.heading.clone(), String::new(), intro, String::new()];
        lines.push(markdown_row(&headers, &widths));
        lines.push(format!(
            "| {} |",
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join(" | ")
        ));
        for row in &cells {
            lines.push(markdown_row(row, &widths));
        }

        lines.push(String::new());
        lines.push(format!("**{}**", summary_sentence(report)));

        if let Some(source) = report.fixture_source() {
            lines.push(String::new());
            lines.push(format!(
                "{} Pre-recorded figures, not measured in this run ({}).",
                FIXTURE_MARK, source
            ));
        }

        lines.join("\n")
    }
}

fn markdown_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    format!("| {} |", padded.join(" | "))
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

/// Terminal rendering with aligned columns
#[derive(Debug, Clone, Default)]
pub struct PlainRenderer;

impl ReportRenderer for PlainRenderer {
    fn render(&self, report: &Report) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("tokbench Results\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  encoding: {}  iterations: {}  warmup: {}\n\n",
            report.meta.parameters.encoding,
            report.meta.parameters.iterations,
            report.meta.parameters.warmup_iterations
        ));

        let rows = table_rows(report);
        let name_width = rows
            .iter()
            .map(|r| r.implementation.chars().count())
            .max()
            .unwrap_or(14)
            .max(14);
        let op_width = rows
            .iter()
            .map(|r| r.operation.chars().count())
            .max()
            .unwrap_or(9)
            .max(9);

        output.push_str(&format!(
            "  {}  {}  {:>12}  {:>14}  {:>9}  {:>8}\n",
            pad("Implementation", name_width),
            pad("Operation", op_width),
            "Time",
            "Throughput",
            "Memory",
            "Speed"
        ));
        output.push_str(&format!("  {}\n", "-".repeat(name_width + op_width + 55)));

        for row in &rows {
            let marker = if row.is_fixture { " (recorded)" } else { "" };
            output.push_str(&format!(
                "  {}  {}  {:>12}  {:>14}  {:>9}  {:>8}{}\n",
                pad(&row.implementation, name_width),
                pad(&row.operation, op_width),
                row.time,
                row.throughput,
                row.memory,
                row.relative,
                marker
            ));
        }

        let mismatched: Vec<&str> = report
            .results
            .iter()
            .filter(|r| r.token_count_mismatch())
            .map(|r| r.name.as_str())
            .collect();
        if !mismatched.is_empty() {
            output.push_str(&format!(
                "\n  warning: token counts differ for: {}\n",
                mismatched.join(", ")
            ));
        }

        output.push_str("\nSummary\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("  {}\n", summary_sentence(report)));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare;
    use crate::comparison::tests::measurement;
    use crate::report::tests::meta;
    use tokbench_core::Provenance;

    fn report() -> Report {
        let mut recorded = measurement("tiktokenx", 4.1e-6, 0.05, 8);
        recorded.provenance = Provenance::Fixture {
            source: "criterion on M1 Pro".to_string(),
        };
        Report::build(
            meta(),
            "Python tiktoken",
            "tiktokenx",
            vec![compare(
                "Short text",
                29,
                measurement("python", 8.2e-6, 0.1, 8),
                recorded,
            )],
        )
    }

    #[test]
    fn test_rows_baseline_then_candidate() {
        let rows = table_rows(&report());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].implementation, "Python tiktoken");
        assert_eq!(rows[0].operation, "Encode short text");
        assert_eq!(rows[0].relative, "1.0x");
        assert_eq!(rows[0].time, "8.2 μs");
        assert!(!rows[0].is_fixture);
        assert_eq!(rows[1].relative, "2.0x");
        assert_eq!(rows[1].memory, "0.1 MB");
        assert!(rows[1].is_candidate && rows[1].is_fixture);
    }

    #[test]
    fn test_operation_label_from_scenario_name() {
        let label = |name: &str| {
            let m = measurement("a", 1e-6, 0.1, 1);
            operation_label(&compare(name, 5, m.clone(), m))
        };
        assert_eq!(label("Short text"), "Encode short text");
        assert_eq!(label("Long text"), "Encode long text");
        assert_eq!(label("Unicode"), "Encode unicode text");
        assert_eq!(label("Medium text sample"), "Encode medium text");
    }

    #[test]
    fn test_markdown_section_shape() {
        let md = MarkdownRenderer::default()
            .with_intro("Benchmarks on a test box:")
            .render(&report());
        let lines: Vec<&str> = md.lines().collect();

        assert_eq!(lines[0], "## Performance");
        assert_eq!(lines[2], "Benchmarks on a test box:");
        assert!(lines[4].starts_with("| Implementation"));
        assert!(lines[4].ends_with("vs Python tiktoken |"));
        assert!(lines[5].starts_with("| ---"));
        assert!(lines[6].contains("| 1.0x"));
        assert!(lines[7].starts_with("| tiktokenx†"));
        assert!(lines[7].contains("**2.0x**"));
        assert!(md.contains("**Average across 1 scenario(s): 2.0x encode speedup"));
        assert!(md.contains("Pre-recorded figures, not measured in this run (criterion on M1 Pro)"));
        assert!(!md.ends_with('\n'));
    }

    #[test]
    fn test_markdown_columns_aligned() {
        let md = MarkdownRenderer::default().render(&report());
        let table: Vec<&str> = md.lines().filter(|l| l.starts_with('|')).collect();
        let width = table[0].chars().count();
        assert!(table.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn test_plain_renderer_lists_rows_and_summary() {
        let text = PlainRenderer.render(&report());
        assert!(text.contains("tokbench Results"));
        assert!(text.contains("Encode short text"));
        assert!(text.contains("(recorded)"));
        assert!(text.contains("2.0x encode speedup"));
        assert!(!text.contains("warning: token counts differ"));
    }

    #[test]
    fn test_plain_renderer_warns_on_mismatch() {
        let report = Report::build(
            meta(),
            "A",
            "B",
            vec![compare(
                "Long text",
                4500,
                measurement("a", 1e-4, 1.0, 900),
                measurement("b", 1e-4, 1.0, 4500),
            )],
        );
        let text = PlainRenderer.render(&report);
        assert!(text.contains("warning: token counts differ for: Long text"));
    }

    #[test]
    fn test_undefined_speedup_not_bolded() {
        let report = Report::build(
            meta(),
            "A",
            "B",
            vec![compare(
                "Short text",
                29,
                measurement("a", 1e-6, 1.0, 8),
                measurement("b", 0.0, 0.0, 8),
            )],
        );
        let md = MarkdownRenderer::default().render(&report);
        assert!(md.contains("| n/a"));
        assert!(!md.contains("**n/a**"));
        assert!(md.contains("n/a encode speedup"));
    }
}
