//! Measurement Engine
//!
//! Runs the timing protocol for one tokenizer against one text:
//!
//! ```text
//! settle ─► warmup (encode+decode × W) ─► settle ─► sample memory_before
//!        ─► encode × N (timed)          ─► sample memory_after_encode
//!        ─► encode × 1 (untimed, tokens for decode)
//!        ─► decode × N (timed)          ─► sample memory_after_decode
//! ```
//!
//! The untimed encode sits after `memory_after_encode`, so its allocations
//! are attributed to the decode phase. Results stay comparable with figures
//! recorded by earlier runs that used the same order.

use crate::error::{CoreError, Result};
use crate::memory::MemorySampler;
use crate::result::{MeasurementResult, Provenance};
use crate::timer::Timer;
use crate::tokenizer::Tokenizer;
use std::hint::black_box;
use std::sync::Arc;
use tokbench_stats::summarize;

/// Iteration counts for one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureParams {
    /// Timed iterations per phase, must be > 0
    pub iterations: usize,
    /// Untimed encode+decode passes before timing
    pub warmup_iterations: usize,
}

impl MeasureParams {
    /// Create params, rejecting zero timed iterations
    pub fn new(iterations: usize, warmup_iterations: usize) -> Result<Self> {
        let params = Self {
            iterations,
            warmup_iterations,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(CoreError::InvalidIterations);
        }
        Ok(())
    }
}

impl Default for MeasureParams {
    fn default() -> Self {
        Self {
            iterations: 1000,
            warmup_iterations: 10,
        }
    }
}

/// Raw samples from one run of the protocol, before summarising
#[derive(Debug, Clone)]
pub struct RawMeasurement {
    /// Text length in characters
    pub text_length: usize,
    /// Tokens from the untimed encode
    pub token_count: usize,
    /// One entry per timed encode, seconds
    pub encode_seconds: Vec<f64>,
    /// One entry per timed decode, seconds
    pub decode_seconds: Vec<f64>,
    /// MiB before the timed phases
    pub memory_before: f64,
    /// MiB after the encode phase
    pub memory_after_encode: f64,
    /// MiB after the decode phase
    pub memory_after_decode: f64,
}

impl RawMeasurement {
    /// Reduce the samples to a `MeasurementResult`
    pub fn summarize(&self, implementation: &str, encoding: &str) -> MeasurementResult {
        let encode = summarize(&self.encode_seconds);
        let decode = summarize(&self.decode_seconds);

        MeasurementResult {
            implementation: implementation.to_string(),
            encoding: encoding.to_string(),
            provenance: Provenance::Live,
            iterations: self.encode_seconds.len(),
            text_length: self.text_length,
            token_count: self.token_count,
            encode_mean: encode.mean,
            encode_median: encode.median,
            encode_min: encode.min,
            decode_mean: decode.mean,
            decode_median: decode.median,
            decode_min: decode.min,
            memory_before: self.memory_before,
            memory_after_encode: self.memory_after_encode,
            memory_after_decode: self.memory_after_decode,
            memory_used: self.memory_after_decode - self.memory_before,
        }
    }
}

/// Times one tokenizer, sampling memory around each phase
#[derive(Clone)]
pub struct MeasurementEngine {
    tokenizer: Arc<dyn Tokenizer>,
    sampler: Arc<dyn MemorySampler>,
}

impl MeasurementEngine {
    /// Create an engine for an already-acquired tokenizer
    pub fn new(tokenizer: Arc<dyn Tokenizer>, sampler: Arc<dyn MemorySampler>) -> Self {
        Self { tokenizer, sampler }
    }

    /// The tokenizer under measurement
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Run the protocol and summarise it
    pub fn measure(&self, text: &str, params: &MeasureParams) -> Result<MeasurementResult> {
        let raw = self.sample(text, params)?;
        Ok(raw.summarize(self.tokenizer.name(), self.tokenizer.encoding()))
    }

    /// Run the protocol and return the raw samples
    pub fn sample(&self, text: &str, params: &MeasureParams) -> Result<RawMeasurement> {
        params.validate()?;
        if text.is_empty() {
            return Err(CoreError::EmptyText);
        }

        let tokenizer = self.tokenizer.as_ref();
        let iterations = params.iterations;

        self.sampler.settle();

        tracing::debug!(
            implementation = tokenizer.name(),
            warmup = params.warmup_iterations,
            "warmup"
        );
        for _ in 0..params.warmup_iterations {
            let tokens = tokenizer.encode(black_box(text));
            black_box(tokenizer.decode(&tokens)?);
        }

        self.sampler.settle();
        let memory_before = self.sampler.resident_megabytes();

        tracing::debug!(implementation = tokenizer.name(), iterations, "encode phase");
        let mut encode_seconds = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            let timer = Timer::start();
            let tokens = tokenizer.encode(black_box(text));
            encode_seconds.push(timer.stop_seconds());
            drop(black_box(tokens));
        }

        let memory_after_encode = self.sampler.resident_megabytes();

        let tokens = tokenizer.encode(text);

        tracing::debug!(
            implementation = tokenizer.name(),
            iterations,
            tokens = tokens.len(),
            "decode phase"
        );
        let mut decode_seconds = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            let timer = Timer::start();
            let decoded = tokenizer.decode(black_box(&tokens))?;
            decode_seconds.push(timer.stop_seconds());
            drop(black_box(decoded));
        }

        let memory_after_decode = self.sampler.resident_megabytes();

        Ok(RawMeasurement {
            text_length: text.chars().count(),
            token_count: tokens.len(),
            encode_seconds,
            decode_seconds,
            memory_before,
            memory_after_encode,
            memory_after_decode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::ByteLevelTokenizer;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns readings from a fixed script, repeating the last one
    struct ScriptedMemory {
        readings: Mutex<Vec<f64>>,
        settles: AtomicUsize,
    }

    impl ScriptedMemory {
        fn new(readings: &[f64]) -> Self {
            let mut readings = readings.to_vec();
            readings.reverse();
            Self {
                readings: Mutex::new(readings),
                settles: AtomicUsize::new(0),
            }
        }
    }

    impl MemorySampler for ScriptedMemory {
        fn resident_megabytes(&self) -> f64 {
            let mut readings = self.readings.lock().unwrap();
            if readings.len() > 1 {
                readings.pop().unwrap()
            } else {
                readings.last().copied().unwrap_or(0.0)
            }
        }

        fn settle(&self) {
            self.settles.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Counts calls so the protocol order can be checked
    struct CountingTokenizer {
        inner: ByteLevelTokenizer,
        encodes: AtomicUsize,
        decodes: AtomicUsize,
    }

    impl CountingTokenizer {
        fn new() -> Self {
            Self {
                inner: ByteLevelTokenizer::new("test"),
                encodes: AtomicUsize::new(0),
                decodes: AtomicUsize::new(0),
            }
        }
    }

    impl Tokenizer for CountingTokenizer {
        fn name(&self) -> &str {
            "counting"
        }

        fn encoding(&self) -> &str {
            self.inner.encoding()
        }

        fn encode(&self, text: &str) -> Vec<u32> {
            self.encodes.fetch_add(1, Ordering::SeqCst);
            self.inner.encode(text)
        }

        fn decode(&self, tokens: &[u32]) -> Result<String> {
            self.decodes.fetch_add(1, Ordering::SeqCst);
            self.inner.decode(tokens)
        }
    }

    #[test]
    fn test_records_exactly_n_samples_per_phase() {
        let tokenizer = Arc::new(CountingTokenizer::new());
        let engine = MeasurementEngine::new(tokenizer.clone(), Arc::new(ScriptedMemory::new(&[1.0])));

        let params = MeasureParams::new(25, 3).unwrap();
        let raw = engine.sample("hello world", &params).unwrap();

        assert_eq!(raw.encode_seconds.len(), 25);
        assert_eq!(raw.decode_seconds.len(), 25);
        // warmup + timed + one untimed encode for the decode phase
        assert_eq!(tokenizer.encodes.load(Ordering::SeqCst), 3 + 25 + 1);
        assert_eq!(tokenizer.decodes.load(Ordering::SeqCst), 3 + 25);
    }

    #[test]
    fn test_memory_samples_in_protocol_order() {
        let sampler = Arc::new(ScriptedMemory::new(&[10.0, 10.5, 9.5]));
        let engine = MeasurementEngine::new(Arc::new(ByteLevelTokenizer::new("test")), sampler.clone());

        let result = engine
            .measure("abc", &MeasureParams::new(2, 1).unwrap())
            .unwrap();

        assert_eq!(result.memory_before, 10.0);
        assert_eq!(result.memory_after_encode, 10.5);
        assert_eq!(result.memory_after_decode, 9.5);
        // Negative usage is reported as-is
        assert!((result.memory_used - -0.5).abs() < 1e-12);
        assert_eq!(sampler.settles.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_summary_fields() {
        let engine = MeasurementEngine::new(
            Arc::new(ByteLevelTokenizer::new("cl100k_base")),
            Arc::new(ScriptedMemory::new(&[0.0])),
        );
        let text = "ab".repeat(50);
        let result = engine.measure(&text, &MeasureParams::new(50, 0).unwrap()).unwrap();

        assert_eq!(result.implementation, "byte-level");
        assert_eq!(result.encoding, "cl100k_base");
        assert_eq!(result.text_length, 100);
        assert_eq!(result.token_count, 100);
        assert_eq!(result.iterations, 50);
        assert!(result.provenance.is_live());
        assert!(result.encode_min <= result.encode_median);
        assert!(result.encode_min <= result.encode_mean);
        assert!(result.decode_min <= result.decode_median);
        assert!(result.decode_min <= result.decode_mean);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert_eq!(MeasureParams::new(0, 10), Err(CoreError::InvalidIterations));

        let engine = MeasurementEngine::new(
            Arc::new(ByteLevelTokenizer::new("test")),
            Arc::new(ScriptedMemory::new(&[0.0])),
        );
        let params = MeasureParams {
            iterations: 0,
            warmup_iterations: 0,
        };
        assert_eq!(
            engine.sample("x", &params).unwrap_err(),
            CoreError::InvalidIterations
        );
    }

    #[test]
    fn test_empty_text_rejected() {
        let engine = MeasurementEngine::new(
            Arc::new(ByteLevelTokenizer::new("test")),
            Arc::new(ScriptedMemory::new(&[0.0])),
        );
        assert_eq!(
            engine.sample("", &MeasureParams::default()).unwrap_err(),
            CoreError::EmptyText
        );
    }
}
