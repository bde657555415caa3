//! Configuration loading from tokbench.toml
//!
//! tokbench configuration can be specified in a `tokbench.toml` file in the
//! project root. The file is discovered by walking up from the current
//! directory. Every field has a default, so an empty file (or none at all)
//! reproduces the standard two-scenario comparison.
//!
//! The parsed `TokbenchConfig` plus command-line overrides resolve into an
//! immutable `RunConfig`, which is the only configuration the executor sees.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokbench_core::{FixtureTable, MeasureParams, Scenario, TIKTOKEN, TIKTOKEN_ORDINARY};
use tokbench_report::OutputFormat;

/// Name of the configuration file looked up by `discover`
pub const CONFIG_FILE_NAME: &str = "tokbench.toml";

/// Configuration errors; all are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A scenario resolves to empty text
    #[error("Scenario '{name}' has empty text")]
    EmptyScenario {
        /// Scenario name
        name: String,
    },

    /// The scenario table is empty
    #[error("No scenarios configured")]
    NoScenarios,

    /// Zero timed iterations requested
    #[error("Iterations must be greater than zero")]
    InvalidIterations,

    /// Fixture strategy without a fixture table
    #[error("Reference strategy is 'fixture' but no [reference.fixture] table is configured")]
    MissingFixture,

    /// Unrecognised output format
    #[error("{0}")]
    UnknownFormat(String),
}

/// tokbench configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokbenchConfig {
    /// Iteration counts and encoding
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Implementation A, always measured live
    #[serde(default = "default_baseline")]
    pub baseline: ImplementationConfig,
    /// Implementation B, live or replayed
    #[serde(default)]
    pub reference: ReferenceConfig,
    /// Document to patch with the markdown section
    #[serde(default)]
    pub document: DocumentConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Scenario table
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<ScenarioConfig>,
}

impl Default for TokbenchConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            baseline: default_baseline(),
            reference: ReferenceConfig::default(),
            document: DocumentConfig::default(),
            output: OutputConfig::default(),
            scenarios: default_scenarios(),
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Timed iterations per phase
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Untimed encode+decode passes before timing
    #[serde(default = "default_warmup_iterations")]
    pub warmup_iterations: usize,
    /// Encoding id passed to both implementations
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            warmup_iterations: default_warmup_iterations(),
            encoding: default_encoding(),
        }
    }
}

fn default_iterations() -> usize {
    1000
}
fn default_warmup_iterations() -> usize {
    10
}
fn default_encoding() -> String {
    "cl100k_base".to_string()
}

/// One implementation and its display label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementationConfig {
    /// Registry name, e.g. "tiktoken-rs"
    pub implementation: String,
    /// Display label; defaults to the implementation name
    #[serde(default)]
    pub label: Option<String>,
}

impl ImplementationConfig {
    /// Label shown in reports
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.implementation.clone())
    }
}

fn default_baseline() -> ImplementationConfig {
    ImplementationConfig {
        implementation: TIKTOKEN.to_string(),
        label: None,
    }
}

/// How implementation B's figures are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceStrategy {
    /// Measure in-process (default)
    #[default]
    Live,
    /// Replay the `[reference.fixture]` table
    Fixture,
}

impl std::str::FromStr for ReferenceStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(ReferenceStrategy::Live),
            "fixture" => Ok(ReferenceStrategy::Fixture),
            other => Err(format!("Unknown reference strategy: {}", other)),
        }
    }
}

/// Implementation B
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// "live" or "fixture"
    #[serde(default)]
    pub strategy: ReferenceStrategy,
    /// Registry name for live runs, or a free-form name for fixtures
    #[serde(default = "default_reference_implementation")]
    pub implementation: String,
    /// Display label; defaults to the implementation name
    #[serde(default)]
    pub label: Option<String>,
    /// Figures recorded by an external run
    #[serde(default)]
    pub fixture: Option<FixtureTable>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            strategy: ReferenceStrategy::default(),
            implementation: default_reference_implementation(),
            label: None,
            fixture: None,
        }
    }
}

fn default_reference_implementation() -> String {
    TIKTOKEN_ORDINARY.to_string()
}

/// Target document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path of the document, relative to the working directory
    #[serde(default = "default_document_path")]
    pub path: String,
    /// First line of the replaced section
    #[serde(default = "default_start_marker")]
    pub start_marker: String,
    /// First line after the replaced section (kept)
    #[serde(default = "default_end_marker")]
    pub end_marker: String,
    /// Sentence under the section heading
    #[serde(default)]
    pub intro: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: default_document_path(),
            start_marker: default_start_marker(),
            end_marker: default_end_marker(),
            intro: None,
        }
    }
}

fn default_document_path() -> String {
    "README.md".to_string()
}
fn default_start_marker() -> String {
    "## Performance".to_string()
}
fn default_end_marker() -> String {
    "## Development".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "markdown" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

/// One scenario entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Scenario name, e.g. "Long text"
    pub name: String,
    /// Input text, repeated `repeat` times
    pub text: String,
    /// Repetitions of `text` (default 1)
    #[serde(default = "default_repeat")]
    pub repeat: usize,
    /// Declared character count of the final text; a mismatch is only logged
    #[serde(default)]
    pub expected_chars: Option<usize>,
}

fn default_repeat() -> usize {
    1
}

impl ScenarioConfig {
    /// Build the immutable scenario
    pub fn to_scenario(&self) -> Result<Scenario, ConfigError> {
        let text = self.text.repeat(self.repeat);
        let expected = self
            .expected_chars
            .unwrap_or_else(|| text.chars().count());

        let scenario = Scenario::new(&self.name, text, expected).map_err(|_| {
            ConfigError::EmptyScenario {
                name: self.name.clone(),
            }
        })?;

        if !scenario.matches_expected() {
            tracing::warn!(
                scenario = scenario.name(),
                expected = scenario.expected_chars(),
                actual = scenario.char_count(),
                "scenario text length differs from expected_chars"
            );
        }
        Ok(scenario)
    }
}

fn default_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig {
            name: "Short text".to_string(),
            text: "Hello, world! This is a test.".to_string(),
            repeat: 1,
            expected_chars: Some(29),
        },
        ScenarioConfig {
            name: "Long text".to_string(),
            text: "The quick brown fox jumps over the lazy dog. ".to_string(),
            repeat: 100,
            expected_chars: Some(4500),
        },
    ]
}

impl TokbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Find `tokbench.toml` by walking up from the current directory
    ///
    /// Returns `None` when no file exists; a file that exists but fails to
    /// parse is an error.
    pub fn discover() -> Result<Option<Self>, ConfigError> {
        let Ok(mut dir) = std::env::current_dir() else {
            return Ok(None);
        };
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                return Self::load(&config_path).map(Some);
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r###"# tokbench configuration

[runner]
# Timed iterations per phase (encode, then decode)
iterations = 1000
# Untimed encode+decode passes before timing
warmup_iterations = 10
# Encoding id: cl100k_base, o200k_base, p50k_base, p50k_edit, r50k_base
encoding = "cl100k_base"

[baseline]
# Implementation A, always measured in-process
implementation = "tiktoken-rs"
# label = "tiktoken-rs"

[reference]
# "live" measures in-process; "fixture" replays [reference.fixture]
strategy = "live"
implementation = "tiktoken-rs-ordinary"
# label = "tiktoken-rs (ordinary)"

# Figures recorded by an external run, used when strategy = "fixture"
# or when the reference implementation cannot be loaded.
# [reference.fixture]
# source = "cargo bench (criterion), Apple M1 Pro"
# short = { encode_seconds = 4.1e-6, decode_seconds = 6.8e-6, memory_used_mb = 0.05 }
# long = { encode_seconds = 175.4e-6, decode_seconds = 34.0e-6, memory_used_mb = 0.2 }

[document]
path = "README.md"
start_marker = "## Performance"
end_marker = "## Development"
# intro = "Benchmarks on Apple M1 Pro:"

[output]
# human, markdown or json
format = "human"

[[scenarios]]
name = "Short text"
text = "Hello, world! This is a test."
expected_chars = 29

[[scenarios]]
name = "Long text"
text = "The quick brown fox jumps over the lazy dog. "
repeat = 100
expected_chars = 4500
"###
        .to_string()
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--iterations`
    pub iterations: Option<usize>,
    /// `--warmup`
    pub warmup_iterations: Option<usize>,
    /// `--encoding`
    pub encoding: Option<String>,
    /// `--strategy`
    pub strategy: Option<ReferenceStrategy>,
    /// `--format`
    pub format: Option<String>,
    /// `--document`
    pub document: Option<PathBuf>,
}

/// Implementation identity after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationSpec {
    /// Registry name
    pub implementation: String,
    /// Display label
    pub label: String,
}

/// Implementation B after resolution
#[derive(Debug, Clone)]
pub struct ReferencePlan {
    /// Live or fixture
    pub strategy: ReferenceStrategy,
    /// Implementation identity
    pub spec: ImplementationSpec,
    /// Recorded figures, also the fallback for an unavailable live reference
    pub fixture: Option<FixtureTable>,
}

/// Document patch target after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    /// Document path
    pub path: PathBuf,
    /// Start of the replaced section, also the rendered heading
    pub start_marker: String,
    /// Start of the following section
    pub end_marker: String,
    /// Intro sentence for the rendered section
    pub intro: Option<String>,
}

/// Immutable configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Iteration counts
    pub params: MeasureParams,
    /// Encoding id for both implementations
    pub encoding: String,
    /// Implementation A
    pub baseline: ImplementationSpec,
    /// Implementation B
    pub reference: ReferencePlan,
    /// All configured scenarios, in order
    pub scenarios: Vec<Scenario>,
    /// Patch target
    pub document: DocumentTarget,
    /// Output format
    pub format: OutputFormat,
}

impl RunConfig {
    /// Layer overrides on top of the file configuration and validate
    pub fn resolve(config: &TokbenchConfig, overrides: &Overrides) -> Result<Self, ConfigError> {
        let iterations = overrides.iterations.unwrap_or(config.runner.iterations);
        let warmup_iterations = overrides
            .warmup_iterations
            .unwrap_or(config.runner.warmup_iterations);
        let params = MeasureParams::new(iterations, warmup_iterations)
            .map_err(|_| ConfigError::InvalidIterations)?;

        let strategy = overrides.strategy.unwrap_or(config.reference.strategy);
        if strategy == ReferenceStrategy::Fixture && config.reference.fixture.is_none() {
            return Err(ConfigError::MissingFixture);
        }

        let format_str = overrides
            .format
            .clone()
            .unwrap_or_else(|| config.output.format.clone());
        let format: OutputFormat = format_str.parse().map_err(ConfigError::UnknownFormat)?;

        if config.scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }
        let scenarios = config
            .scenarios
            .iter()
            .map(ScenarioConfig::to_scenario)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            params,
            encoding: overrides
                .encoding
                .clone()
                .unwrap_or_else(|| config.runner.encoding.clone()),
            baseline: ImplementationSpec {
                implementation: config.baseline.implementation.clone(),
                label: config.baseline.display_label(),
            },
            reference: ReferencePlan {
                strategy,
                spec: ImplementationSpec {
                    implementation: config.reference.implementation.clone(),
                    label: config
                        .reference
                        .label
                        .clone()
                        .unwrap_or_else(|| config.reference.implementation.clone()),
                },
                fixture: config.reference.fixture.clone(),
            },
            scenarios,
            document: DocumentTarget {
                path: overrides
                    .document
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(&config.document.path)),
                start_marker: config.document.start_marker.clone(),
                end_marker: config.document.end_marker.clone(),
                intro: config.document.intro.clone(),
            },
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TokbenchConfig::default();
        assert_eq!(config.runner.iterations, 1000);
        assert_eq!(config.runner.warmup_iterations, 10);
        assert_eq!(config.runner.encoding, "cl100k_base");
        assert_eq!(config.baseline.implementation, "tiktoken-rs");
        assert_eq!(config.reference.strategy, ReferenceStrategy::Live);
        assert_eq!(config.document.start_marker, "## Performance");
        assert_eq!(config.document.end_marker, "## Development");
        assert_eq!(config.scenarios.len(), 2);
    }

    #[test]
    fn test_default_scenarios_resolve() {
        let run = RunConfig::resolve(&TokbenchConfig::default(), &Overrides::default()).unwrap();
        assert_eq!(run.scenarios[0].char_count(), 29);
        assert_eq!(run.scenarios[1].char_count(), 4500);
        assert!(run.scenarios.iter().all(Scenario::matches_expected));
        assert_eq!(run.format, OutputFormat::Human);
        assert_eq!(run.document.path, PathBuf::from("README.md"));
    }

    #[test]
    fn test_parse_toml_partial() {
        let toml_str = r#"
            [runner]
            iterations = 50

            [reference]
            strategy = "fixture"
            implementation = "tiktokenx"
            label = "tiktokenx"

            [reference.fixture]
            source = "criterion, M1 Pro"
            short = { encode_seconds = 4.1e-6, decode_seconds = 6.8e-6, memory_used_mb = 0.05 }
            long = { encode_seconds = 175.4e-6, decode_seconds = 34.0e-6, memory_used_mb = 0.2 }
        "#;

        let config: TokbenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.iterations, 50);
        // Defaults still apply
        assert_eq!(config.runner.warmup_iterations, 10);
        assert_eq!(config.scenarios.len(), 2);

        let fixture = config.reference.fixture.as_ref().unwrap();
        assert_eq!(fixture.long.encode_seconds, 175.4e-6);
        assert_eq!(fixture.source, "criterion, M1 Pro");

        let run = RunConfig::resolve(&config, &Overrides::default()).unwrap();
        assert_eq!(run.reference.strategy, ReferenceStrategy::Fixture);
        assert_eq!(run.reference.spec.label, "tiktokenx");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: TokbenchConfig = toml::from_str(&TokbenchConfig::default_toml()).unwrap();
        assert_eq!(config.runner.iterations, 1000);
        assert_eq!(config.scenarios[1].repeat, 100);
        let run = RunConfig::resolve(&config, &Overrides::default()).unwrap();
        assert_eq!(run.scenarios[1].char_count(), 4500);
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            iterations: Some(5),
            warmup_iterations: Some(0),
            encoding: Some("o200k_base".to_string()),
            format: Some("markdown".to_string()),
            document: Some(PathBuf::from("docs/PERF.md")),
            ..Default::default()
        };
        let run = RunConfig::resolve(&TokbenchConfig::default(), &overrides).unwrap();

        assert_eq!(run.params.iterations, 5);
        assert_eq!(run.params.warmup_iterations, 0);
        assert_eq!(run.encoding, "o200k_base");
        assert_eq!(run.format, OutputFormat::Markdown);
        assert_eq!(run.document.path, PathBuf::from("docs/PERF.md"));
    }

    #[test]
    fn test_fixture_strategy_requires_table() {
        let overrides = Overrides {
            strategy: Some(ReferenceStrategy::Fixture),
            ..Default::default()
        };
        let err = RunConfig::resolve(&TokbenchConfig::default(), &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFixture));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero = Overrides {
            iterations: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            RunConfig::resolve(&TokbenchConfig::default(), &zero),
            Err(ConfigError::InvalidIterations)
        ));

        let html = Overrides {
            format: Some("html".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            RunConfig::resolve(&TokbenchConfig::default(), &html),
            Err(ConfigError::UnknownFormat(_))
        ));

        let mut empty = TokbenchConfig::default();
        empty.scenarios = vec![ScenarioConfig {
            name: "blank".to_string(),
            text: "abc".to_string(),
            repeat: 0,
            expected_chars: None,
        }];
        assert!(matches!(
            RunConfig::resolve(&empty, &Overrides::default()),
            Err(ConfigError::EmptyScenario { .. })
        ));

        empty.scenarios.clear();
        assert!(matches!(
            RunConfig::resolve(&empty, &Overrides::default()),
            Err(ConfigError::NoScenarios)
        ));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("LIVE".parse::<ReferenceStrategy>(), Ok(ReferenceStrategy::Live));
        assert_eq!("fixture".parse::<ReferenceStrategy>(), Ok(ReferenceStrategy::Fixture));
        assert!("cached".parse::<ReferenceStrategy>().is_err());
    }
}
