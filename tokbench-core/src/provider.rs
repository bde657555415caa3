//! Result Providers
//!
//! A run compares two implementations. Each side is a `ResultProvider`
//! chosen once at composition time:
//!
//! - `LiveProvider`: runs the measurement engine in-process (authoritative)
//! - `FixtureProvider`: replays figures recorded by an external run, for
//!   implementations that cannot execute in this process
//!
//! Fixture results carry `Provenance::Fixture` so reports can tell them apart.

use crate::engine::{MeasureParams, MeasurementEngine};
use crate::error::{CoreError, Result};
use crate::result::{MeasurementResult, Provenance};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Texts up to this many characters use the `short` fixture figures
pub const SHORT_TEXT_MAX_CHARS: usize = 100;

/// Supplies a `MeasurementResult` for one implementation
pub trait ResultProvider {
    /// Display label for reports
    fn label(&self) -> &str;

    /// Produce figures for `text`
    fn provide(&self, text: &str, params: &MeasureParams) -> Result<MeasurementResult>;
}

/// Measures live through a `MeasurementEngine`
pub struct LiveProvider {
    label: String,
    engine: MeasurementEngine,
}

impl LiveProvider {
    /// Wrap an engine under a display label
    pub fn new(label: impl Into<String>, engine: MeasurementEngine) -> Self {
        Self {
            label: label.into(),
            engine,
        }
    }
}

impl ResultProvider for LiveProvider {
    fn label(&self) -> &str {
        &self.label
    }

    fn provide(&self, text: &str, params: &MeasureParams) -> Result<MeasurementResult> {
        self.engine.measure(text, params)
    }
}

/// Coarse input size class used to key fixture figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeBucket {
    /// At most `SHORT_TEXT_MAX_CHARS` characters
    Short,
    /// Everything longer
    Long,
}

impl SizeBucket {
    /// Classify a text by character count
    pub fn of(text: &str) -> Self {
        if text.chars().count() <= SHORT_TEXT_MAX_CHARS {
            SizeBucket::Short
        } else {
            SizeBucket::Long
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeBucket::Short => write!(f, "short"),
            SizeBucket::Long => write!(f, "long"),
        }
    }
}

/// Recorded figures for one size bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixtureFigures {
    /// Mean encode time, seconds
    pub encode_seconds: f64,
    /// Mean decode time, seconds
    pub decode_seconds: f64,
    /// Memory used over the run, MiB
    pub memory_used_mb: f64,
}

/// Recorded figures for both buckets, with a note on where they came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureTable {
    /// Free-form description of the recording run (machine, tool, date)
    pub source: String,
    /// Figures for short texts
    pub short: FixtureFigures,
    /// Figures for long texts
    pub long: FixtureFigures,
}

impl FixtureTable {
    /// Figures for a bucket
    pub fn figures(&self, bucket: SizeBucket) -> &FixtureFigures {
        match bucket {
            SizeBucket::Short => &self.short,
            SizeBucket::Long => &self.long,
        }
    }
}

/// Replays recorded figures
///
/// The token count still comes from a live tokenizer so the scenario-derived
/// fields agree with the other side of the comparison.
pub struct FixtureProvider {
    label: String,
    implementation: String,
    table: FixtureTable,
    token_source: Arc<dyn Tokenizer>,
}

impl FixtureProvider {
    /// Create a provider for `implementation` using `token_source` for token counts
    pub fn new(
        label: impl Into<String>,
        implementation: impl Into<String>,
        table: FixtureTable,
        token_source: Arc<dyn Tokenizer>,
    ) -> Self {
        Self {
            label: label.into(),
            implementation: implementation.into(),
            table,
            token_source,
        }
    }

    /// The recorded table
    pub fn table(&self) -> &FixtureTable {
        &self.table
    }
}

impl ResultProvider for FixtureProvider {
    fn label(&self) -> &str {
        &self.label
    }

    fn provide(&self, text: &str, _params: &MeasureParams) -> Result<MeasurementResult> {
        if text.is_empty() {
            return Err(CoreError::EmptyText);
        }

        let bucket = SizeBucket::of(text);
        let figures = self.table.figures(bucket);
        let token_count = self.token_source.encode(text).len();

        tracing::debug!(
            implementation = %self.implementation,
            %bucket,
            source = %self.table.source,
            "using recorded figures"
        );

        Ok(MeasurementResult {
            implementation: self.implementation.clone(),
            encoding: self.token_source.encoding().to_string(),
            provenance: Provenance::Fixture {
                source: self.table.source.clone(),
            },
            iterations: 0,
            text_length: text.chars().count(),
            token_count,
            encode_mean: figures.encode_seconds,
            encode_median: figures.encode_seconds,
            encode_min: figures.encode_seconds,
            decode_mean: figures.decode_seconds,
            decode_median: figures.decode_seconds,
            decode_min: figures.decode_seconds,
            memory_before: 0.0,
            memory_after_encode: figures.memory_used_mb,
            memory_after_decode: figures.memory_used_mb,
            memory_used: figures.memory_used_mb,
        })
    }
}
