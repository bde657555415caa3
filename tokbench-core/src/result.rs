//! Measurement Result

use serde::{Deserialize, Serialize};

/// Where a measurement came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Provenance {
    /// Measured in this process, in this run
    Live,
    /// Pre-recorded figures from an earlier, external run
    Fixture {
        /// Description of the run the figures came from
        source: String,
    },
}

impl Provenance {
    /// Whether the figures were measured in this run
    pub fn is_live(&self) -> bool {
        matches!(self, Provenance::Live)
    }
}

/// Timing and memory figures for one (scenario, implementation) pair
///
/// Times are in seconds, memory in MiB. `memory_used` is
/// `memory_after_decode - memory_before` and may be negative when the
/// allocator hands pages back during the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Implementation name
    pub implementation: String,
    /// Encoding id
    pub encoding: String,
    /// Live or fixture
    pub provenance: Provenance,
    /// Timed iterations per phase (0 for fixtures)
    pub iterations: usize,
    /// Length of the input text in characters
    pub text_length: usize,
    /// Tokens produced for the input text
    pub token_count: usize,
    /// Mean encode time
    pub encode_mean: f64,
    /// Median encode time
    pub encode_median: f64,
    /// Fastest encode
    pub encode_min: f64,
    /// Mean decode time
    pub decode_mean: f64,
    /// Median decode time
    pub decode_median: f64,
    /// Fastest decode
    pub decode_min: f64,
    /// Resident memory before the timed phases
    pub memory_before: f64,
    /// Resident memory after the encode phase
    pub memory_after_encode: f64,
    /// Resident memory after the decode phase
    pub memory_after_decode: f64,
    /// `memory_after_decode - memory_before`
    pub memory_used: f64,
}
