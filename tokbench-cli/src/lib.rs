#![warn(missing_docs)]
//! tokbench CLI Library
//!
//! Configuration, scenario planning, execution and document patching behind
//! the `tokbench` binary. Use `tokbench::run()` (or `tokbench_cli::run()`)
//! in a main function to get the full command line.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = tokbench_cli::run() {
//!         eprintln!("Error: {:#}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod confirm;
mod executor;
mod patch;
mod planner;

pub use config::*;
pub use confirm::confirm;
pub use executor::{
    Providers, ScenarioExecutor, build_providers, build_report_meta, execute_run,
};
pub use patch::{PatchError, commit_patch, patch_section};
pub use planner::{ExecutionPlan, build_plan};

use anyhow::Context;
use clap::{Parser, Subcommand};
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokbench_core::{ProcessMemory, TokenizerRegistry};
use tokbench_report::{
    MarkdownRenderer, OutputFormat, PlainRenderer, Report, ReportRenderer, generate_json_report,
};
use tracing_subscriber::EnvFilter;

/// tokbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "tokbench")]
#[command(author, version, about = "tokbench - compare two tokenizer implementations")]
pub struct Cli {
    /// Optional subcommand (Run, List, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter scenarios by regex pattern on their name
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Configuration file (default: tokbench.toml discovered upwards)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Timed iterations per phase
    #[arg(long, short = 'n', global = true)]
    pub iterations: Option<usize>,

    /// Untimed warmup passes before timing
    #[arg(long, global = true)]
    pub warmup: Option<usize>,

    /// Encoding id, e.g. cl100k_base
    #[arg(long, global = true)]
    pub encoding: Option<String>,

    /// Reference strategy: live or fixture
    #[arg(long, global = true)]
    pub strategy: Option<ReferenceStrategy>,

    /// Output format: human, markdown, json
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Document to patch with the markdown section
    #[arg(long, global = true)]
    pub document: Option<PathBuf>,

    /// Patch the document without asking
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Never patch the document
    #[arg(long, global = true, conflicts_with = "yes")]
    pub no_patch: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Configuration values given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            iterations: self.iterations,
            warmup_iterations: self.warmup,
            encoding: self.encoding.clone(),
            strategy: self.strategy,
            format: self.format.clone(),
            document: self.document.clone(),
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the comparison (default)
    Run,
    /// List scenarios and available implementations
    List,
    /// Print a default tokbench.toml
    Init,
}

/// Run the tokbench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, including when the document patch fails or
/// is declined. Invalid configuration and unavailable tokenizers are errors.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the tokbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    if cli.command == Some(Commands::Init) {
        print!("{}", TokbenchConfig::default_toml());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let run = RunConfig::resolve(&config, &cli.overrides())?;
    let filter = Regex::new(&cli.filter)
        .with_context(|| format!("Invalid scenario filter '{}'", cli.filter))?;
    let plan = build_plan(&run.scenarios, Some(&filter));

    match cli.command {
        Some(Commands::List) => list_scenarios(&run, &plan),
        Some(Commands::Run) | None => run_comparison(&cli, &run, &plan),
        Some(Commands::Init) => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tokbench=debug"
    } else {
        "tokbench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Ignore a second initialisation (library use, tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> anyhow::Result<TokbenchConfig> {
    match &cli.config {
        Some(path) => Ok(TokbenchConfig::load(path)?),
        None => Ok(TokbenchConfig::discover()?.unwrap_or_default()),
    }
}

fn list_scenarios(run: &RunConfig, plan: &ExecutionPlan) -> anyhow::Result<()> {
    println!("tokbench Plan:");
    println!(
        "├── baseline: {} ({})",
        run.baseline.label, run.baseline.implementation
    );
    println!(
        "├── reference: {} ({}, {:?})",
        run.reference.spec.label, run.reference.spec.implementation, run.reference.strategy
    );
    println!("├── encoding: {}", run.encoding);
    println!("├── scenarios:");
    for scenario in &plan.scenarios {
        let marker = if scenario.matches_expected() {
            String::new()
        } else {
            format!(" (expected {})", scenario.expected_chars())
        };
        println!(
            "│   ├── {} [{} chars{}]",
            scenario.name(),
            scenario.char_count(),
            marker
        );
    }
    println!("{} scenarios found.", plan.scenarios.len());
    println!(
        "Implementations: {}",
        TokenizerRegistry::implementations().join(", ")
    );
    println!("Encodings: {}", TokenizerRegistry::encodings().join(", "));
    Ok(())
}

/// Markdown section for the run's document target
pub fn render_section(run: &RunConfig, report: &Report) -> String {
    let mut renderer = MarkdownRenderer::new(&run.document.start_marker);
    if let Some(intro) = &run.document.intro {
        renderer = renderer.with_intro(intro);
    }
    renderer.render(report)
}

fn run_comparison(cli: &Cli, run: &RunConfig, plan: &ExecutionPlan) -> anyhow::Result<()> {
    if plan.scenarios.is_empty() {
        println!("No scenarios found.");
        return Ok(());
    }

    eprintln!(
        "Comparing {} vs {} on {} scenarios ({} iterations, {} warmup, {})...\n",
        run.reference.spec.label,
        run.baseline.label,
        plan.scenarios.len(),
        run.params.iterations,
        run.params.warmup_iterations,
        run.encoding
    );

    let report = execute_run(run, &plan.scenarios, Arc::new(ProcessMemory), true)?;
    let section = render_section(run, &report);

    // Generate output
    let output = match run.format {
        OutputFormat::Markdown => format!("{}\n", section),
        OutputFormat::Human => PlainRenderer.render(&report),
        OutputFormat::Json => generate_json_report(&report)?,
    };

    // Write output
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    if !cli.no_patch {
        update_document(&run.document, &section, cli.yes);
    }
    Ok(())
}

/// Offer to patch the document; failures are reported, never returned
fn update_document(target: &DocumentTarget, section: &str, assume_yes: bool) {
    let path = &target.path;
    if !path.exists() {
        eprintln!("Document {} not found, skipping update.", path.display());
        return;
    }

    let proceed = assume_yes || {
        let prompt = format!("Update {} with these results?", path.display());
        confirm(&prompt, std::io::stdin().lock(), std::io::stderr()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read confirmation");
            false
        })
    };
    if !proceed {
        eprintln!("{} not updated.", path.display());
        return;
    }

    match commit_patch(path, &target.start_marker, &target.end_marker, section) {
        Ok(()) => eprintln!("Updated {}.", path.display()),
        Err(e) => eprintln!("Failed to update {}: {}", path.display(), e),
    }
}
