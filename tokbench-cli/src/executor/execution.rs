//! Scenario Execution
//!
//! Scenarios run one after another on the calling thread: baseline first,
//! then reference, each to completion. Progress and the per-scenario summary
//! lines go to stderr so stdout only ever carries the rendered report.
//!
//! ## Data Flow
//!
//! ```text
//!   Scenario
//!      │
//!      ├──► baseline.provide()  ──┐
//!      │                          ├──► compare() ──► ComparisonResult
//!      └──► reference.provide() ──┘
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use tokbench_core::{CoreError, MeasureParams, MeasurementResult, ResultProvider, Scenario};
use tokbench_report::{ComparisonResult, compare, format_memory, format_ratio, format_time};

/// Runs scenarios against two providers
pub struct ScenarioExecutor {
    params: MeasureParams,
    show_progress: bool,
}

impl ScenarioExecutor {
    /// Create an executor with fixed iteration counts
    pub fn new(params: MeasureParams) -> Self {
        Self {
            params,
            show_progress: true,
        }
    }

    /// Disable the progress bar and per-scenario lines
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Execute all scenarios in order
    ///
    /// The first provider error aborts the run; no partial comparison is
    /// produced for the failing scenario.
    pub fn execute(
        &self,
        baseline: &dyn ResultProvider,
        reference: &dyn ResultProvider,
        scenarios: &[Scenario],
    ) -> Result<Vec<ComparisonResult>, CoreError> {
        let pb = if self.show_progress {
            ProgressBar::new(scenarios.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            pb.set_message(scenario.name().to_string());
            let result = match self.execute_single(baseline, reference, scenario) {
                Ok(result) => result,
                Err(err) => {
                    pb.abandon_with_message(format!("{} failed", scenario.name()));
                    return Err(err);
                }
            };

            if self.show_progress {
                let summary = scenario_summary(&result, baseline.label(), reference.label());
                if let Err(e) = print_above(&pb, &summary, &mut std::io::stderr()) {
                    tracing::debug!(error = %e, "could not write scenario summary");
                }
            }
            results.push(result);
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        Ok(results)
    }

    fn execute_single(
        &self,
        baseline: &dyn ResultProvider,
        reference: &dyn ResultProvider,
        scenario: &Scenario,
    ) -> Result<ComparisonResult, CoreError> {
        tracing::info!(
            scenario = scenario.name(),
            chars = scenario.char_count(),
            iterations = self.params.iterations,
            "measuring"
        );

        let a = baseline.provide(scenario.text(), &self.params)?;
        let b = reference.provide(scenario.text(), &self.params)?;
        let result = compare(scenario.name(), scenario.char_count(), a, b);

        if result.token_count_mismatch() {
            tracing::warn!(
                scenario = scenario.name(),
                baseline = result.baseline.token_count,
                candidate = result.candidate.token_count,
                "token counts differ between implementations"
            );
        }
        Ok(result)
    }
}

/// Write `text` above the bar
///
/// `ProgressBar::println` drops output while the bar is hidden (stderr not a
/// terminal), so the bar is suspended and the text written directly.
fn print_above(pb: &ProgressBar, text: &str, out: &mut impl Write) -> std::io::Result<()> {
    pb.suspend(|| writeln!(out, "{}", text))
}

fn implementation_line(label: &str, m: &MeasurementResult) -> String {
    format!(
        "  {}: encode {}, decode {}, memory {}, {} tokens",
        label,
        format_time(m.encode_mean),
        format_time(m.decode_mean),
        format_memory(m.memory_used),
        m.token_count,
    )
}

fn scenario_summary(result: &ComparisonResult, baseline: &str, reference: &str) -> String {
    let mut ratios = format!(
        "  speedup {}, memory {}",
        format_ratio(result.encode_speedup),
        format_ratio(result.memory_improvement),
    );
    if result.token_count_mismatch() {
        ratios.push_str(&format!(
            " [token count mismatch: {} vs {}]",
            result.baseline.token_count, result.candidate.token_count
        ));
    }
    [
        format!("{} ({} chars)", result.name, result.text_length),
        implementation_line(baseline, &result.baseline),
        implementation_line(reference, &result.candidate),
        ratios,
    ]
    .join("\n")
}
