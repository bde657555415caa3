//! Benchmark Scenario

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// A named input text, fixed for the whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    text: String,
    expected_chars: usize,
}

impl Scenario {
    /// Create a scenario; the text must be non-empty
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        expected_chars: usize,
    ) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(CoreError::EmptyText);
        }
        Ok(Self {
            name: name.into(),
            text,
            expected_chars,
        })
    }

    /// Scenario name, e.g. "Short text"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character count declared by the configuration
    pub fn expected_chars(&self) -> usize {
        self.expected_chars
    }

    /// Actual character count of the text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the declared and actual character counts agree
    pub fn matches_expected(&self) -> bool {
        self.char_count() == self.expected_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_rejected() {
        assert_eq!(Scenario::new("empty", "", 0), Err(CoreError::EmptyText));
    }

    #[test]
    fn test_char_count_not_bytes() {
        let scenario = Scenario::new("accents", "héllo", 5).unwrap();
        assert_eq!(scenario.char_count(), 5);
        assert!(scenario.matches_expected());
    }

    #[test]
    fn test_expected_mismatch_detected() {
        let scenario = Scenario::new("short", "Hello, world! This is a test.", 35).unwrap();
        assert_eq!(scenario.char_count(), 29);
        assert!(!scenario.matches_expected());
    }
}
