//! Prompt value object
//!
//! A prompt is the caller-supplied text handed to a text-generation provider.
//! It is immutable and must contain at least one non-whitespace character.
//!
//! # Examples
//!
//! ```
//! use domain::Prompt;
//!
//! let prompt = Prompt::new("Hello, how can I help?").unwrap();
//! assert_eq!(prompt.as_str(), "Hello, how can I help?");
//!
//! // Blank prompts are rejected
//! assert!(Prompt::new("   ").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::DomainError;

/// A validated, non-empty prompt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt {
    #[validate(custom(function = "not_blank"))]
    value: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl Prompt {
    /// Create a new prompt, rejecting empty or whitespace-only text
    ///
    /// The text is kept as supplied; surrounding whitespace is not stripped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyPrompt` if the text has no visible content.
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let candidate = Self { value: text.into() };
        candidate.validate().map_err(|_| DomainError::EmptyPrompt)?;
        Ok(candidate)
    }

    /// Get the prompt as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Length of the prompt in characters
    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl TryFrom<String> for Prompt {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Prompt> for String {
    fn from(prompt: Prompt) -> Self {
        prompt.value
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_text() {
        let prompt = Prompt::new("What is on sale today?").unwrap();
        assert_eq!(prompt.as_str(), "What is on sale today?");
    }

    #[test]
    fn rejects_empty_string() {
        let result = Prompt::new("");
        assert!(matches!(result, Err(DomainError::EmptyPrompt)));
    }

    #[test]
    fn rejects_whitespace_only() {
        let result = Prompt::new(" \n\t ");
        assert!(matches!(result, Err(DomainError::EmptyPrompt)));
    }

    #[test]
    fn keeps_surrounding_whitespace() {
        let prompt = Prompt::new("  hi  ").unwrap();
        assert_eq!(prompt.as_str(), "  hi  ");
    }

    #[test]
    fn char_count_counts_unicode_scalars() {
        let prompt = Prompt::new("grüß").unwrap();
        assert_eq!(prompt.char_count(), 4);
    }

    #[test]
    fn deserializes_from_string() {
        let prompt: Prompt = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(prompt.as_str(), "hello");
    }

    #[test]
    fn deserialization_rejects_blank() {
        let result: Result<Prompt, _> = serde_json::from_str("\"   \"");
        assert!(result.is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let prompt = Prompt::new("hello").unwrap();
        assert_eq!(serde_json::to_string(&prompt).unwrap(), "\"hello\"");
    }
}
