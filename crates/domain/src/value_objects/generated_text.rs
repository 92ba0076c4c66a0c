//! Generated text returned by a provider

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::ProviderIdentity;

/// Text produced by a provider for a single prompt
///
/// Ephemeral: handed straight back to the caller and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText {
    text: String,
    provider: ProviderIdentity,
}

impl GeneratedText {
    /// Wrap provider output
    pub fn new(text: impl Into<String>, provider: ProviderIdentity) -> Self {
        Self {
            text: text.into(),
            provider,
        }
    }

    /// The generated text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Provider that produced the text
    pub const fn provider(&self) -> ProviderIdentity {
        self.provider
    }

    /// Consume and return the text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for GeneratedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
