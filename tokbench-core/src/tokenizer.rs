//! Tokenizer Capability
//!
//! The measurement engine only sees `Tokenizer`: encode text to integer
//! tokens, decode them back. Implementations must be free of observable side
//! effects between calls, otherwise repeated timings are not comparable.
//!
//! Available implementations:
//! - `tiktoken-rs`: BPE via the `tiktoken-rs` crate, special tokens allowed
//! - `tiktoken-rs-ordinary`: same tables, special tokens treated as text
//! - `byte-level`: one token per UTF-8 byte, independent of the encoding id

use crate::error::{CoreError, Result};
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// Name of the tiktoken-rs implementation with special tokens enabled
pub const TIKTOKEN: &str = "tiktoken-rs";
/// Name of the tiktoken-rs implementation using `encode_ordinary`
pub const TIKTOKEN_ORDINARY: &str = "tiktoken-rs-ordinary";
/// Name of the byte-level reference implementation
pub const BYTE_LEVEL: &str = "byte-level";

const IMPLEMENTATIONS: &[&str] = &[TIKTOKEN, TIKTOKEN_ORDINARY, BYTE_LEVEL];
const ENCODINGS: &[&str] = &[
    "cl100k_base",
    "o200k_base",
    "p50k_base",
    "p50k_edit",
    "r50k_base",
];

/// Text tokenizer under measurement
pub trait Tokenizer: Send + Sync {
    /// Implementation name, e.g. `tiktoken-rs`
    fn name(&self) -> &str;

    /// Encoding id this instance was built for
    fn encoding(&self) -> &str;

    /// Encode text into tokens
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode tokens back into text
    fn decode(&self, tokens: &[u32]) -> Result<String>;
}

/// BPE tokenizer backed by `tiktoken-rs`
pub struct TiktokenTokenizer {
    name: &'static str,
    encoding: String,
    bpe: CoreBPE,
    ordinary: bool,
}

impl TiktokenTokenizer {
    /// Load the BPE tables for `encoding`
    ///
    /// With `ordinary = true`, special tokens such as `<|endoftext|>` are
    /// encoded as plain text.
    pub fn load(encoding: &str, ordinary: bool) -> Result<Self> {
        let name = if ordinary { TIKTOKEN_ORDINARY } else { TIKTOKEN };
        let unavailable = |reason: String| CoreError::Unavailable {
            implementation: name.to_string(),
            encoding: encoding.to_string(),
            reason,
        };

        let loaded = match encoding {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "p50k_edit" => tiktoken_rs::p50k_edit(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            other => return Err(unavailable(format!("unknown encoding '{}'", other))),
        };
        let bpe = loaded.map_err(|e| unavailable(e.to_string()))?;

        Ok(Self {
            name,
            encoding: encoding.to_string(),
            bpe,
            ordinary,
        })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn name(&self) -> &str {
        self.name
    }

    fn encoding(&self) -> &str {
        &self.encoding
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        let ranks = if self.ordinary {
            self.bpe.encode_ordinary(text)
        } else {
            self.bpe.encode_with_special_tokens(text)
        };
        ranks.into_iter().map(|rank| rank as u32).collect()
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        let ranks = tokens.iter().map(|&t| t as _).collect();
        self.bpe.decode(ranks).map_err(|e| CoreError::Decode {
            implementation: self.name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// One token per UTF-8 byte
///
/// Has no tables to load, so it is always available. Useful as a floor when
/// comparing BPE implementations, and in tests.
#[derive(Debug, Clone)]
pub struct ByteLevelTokenizer {
    encoding: String,
}

impl ByteLevelTokenizer {
    /// Create a byte-level tokenizer tagged with `encoding`
    pub fn new(encoding: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
        }
    }
}

impl Tokenizer for ByteLevelTokenizer {
    fn name(&self) -> &str {
        BYTE_LEVEL
    }

    fn encoding(&self) -> &str {
        &self.encoding
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        text.bytes().map(u32::from).collect()
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        let bytes = tokens
            .iter()
            .map(|&t| u8::try_from(t))
            .collect::<std::result::Result<Vec<u8>, _>>()
            .map_err(|e| CoreError::Decode {
                implementation: BYTE_LEVEL.to_string(),
                reason: e.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|e| CoreError::Decode {
            implementation: BYTE_LEVEL.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Resolves implementation names to tokenizer instances
pub struct TokenizerRegistry;

impl TokenizerRegistry {
    /// Known implementation names
    pub fn implementations() -> &'static [&'static str] {
        IMPLEMENTATIONS
    }

    /// Encoding ids understood by the tiktoken-rs implementations
    pub fn encodings() -> &'static [&'static str] {
        ENCODINGS
    }

    /// Acquire a tokenizer, loading its tables eagerly
    ///
    /// Loading happens here rather than inside the engine so table construction
    /// never lands in a timed region.
    pub fn acquire(implementation: &str, encoding: &str) -> Result<Arc<dyn Tokenizer>> {
        tracing::debug!(implementation, encoding, "acquiring tokenizer");
        match implementation {
            TIKTOKEN => Ok(Arc::new(TiktokenTokenizer::load(encoding, false)?)),
            TIKTOKEN_ORDINARY => Ok(Arc::new(TiktokenTokenizer::load(encoding, true)?)),
            BYTE_LEVEL => Ok(Arc::new(ByteLevelTokenizer::new(encoding))),
            other => Err(CoreError::Unavailable {
                implementation: other.to_string(),
                encoding: encoding.to_string(),
                reason: format!("unknown implementation; known: {}", IMPLEMENTATIONS.join(", ")),
            }),
        }
    }
}
