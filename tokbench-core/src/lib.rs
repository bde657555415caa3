#![warn(missing_docs)]
//! tokbench Core - Measurement Runtime
//!
//! This crate provides everything needed to time one tokenizer against one text:
//! - `Tokenizer` capability with tiktoken-rs and byte-level adapters
//! - `MemorySampler` capability reading the process resident set
//! - `MeasurementEngine` implementing the warmup / encode / decode protocol
//! - `ResultProvider` strategies (live measurement or pre-recorded fixtures)

mod engine;
mod error;
mod memory;
mod provider;
mod result;
mod scenario;
mod timer;
mod tokenizer;

pub use engine::{MeasureParams, MeasurementEngine, RawMeasurement};
pub use error::{CoreError, Result};
pub use memory::{BYTES_PER_MIB, MemorySampler, ProcessMemory};
pub use provider::{
    FixtureFigures, FixtureProvider, FixtureTable, LiveProvider, ResultProvider, SHORT_TEXT_MAX_CHARS,
    SizeBucket,
};
pub use result::{MeasurementResult, Provenance};
pub use scenario::Scenario;
pub use timer::Timer;
pub use tokenizer::{
    BYTE_LEVEL, ByteLevelTokenizer, TIKTOKEN, TIKTOKEN_ORDINARY, TiktokenTokenizer, Tokenizer,
    TokenizerRegistry,
};
