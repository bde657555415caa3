//! Core error types

use thiserror::Error;

/// Result alias for measurement operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while acquiring tokenizers or measuring them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The tokenizer implementation cannot be loaded. Fatal for a run.
    #[error("Tokenizer '{implementation}' unavailable for encoding '{encoding}': {reason}")]
    Unavailable {
        /// Implementation name as configured
        implementation: String,
        /// Requested encoding id
        encoding: String,
        /// Underlying cause
        reason: String,
    },

    /// A measurement was requested with zero timed iterations
    #[error("Iterations must be greater than zero")]
    InvalidIterations,

    /// A measurement was requested on empty text
    #[error("Scenario text must not be empty")]
    EmptyText,

    /// Decoding a token sequence failed
    #[error("Decode failed in '{implementation}': {reason}")]
    Decode {
        /// Implementation name
        implementation: String,
        /// Underlying cause
        reason: String,
    },
}

impl CoreError {
    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Unavailable { .. })
    }
}
