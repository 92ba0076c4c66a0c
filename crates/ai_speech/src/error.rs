//! Speech processing errors

use thiserror::Error;

/// Errors that can occur during speech processing
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Empty, unsupported or corrupt audio
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Empty or otherwise unusable text for synthesis
    #[error("Invalid text: {0}")]
    InvalidText(String),

    /// Scratch file could not be created, written or read
    #[error("Scratch storage failed: {0}")]
    Storage(String),

    /// Engine output lacks a required field
    #[error("Engine output is missing '{0}'")]
    MissingField(String),

    /// Engine ran but failed (non-zero exit, empty output)
    #[error("Speech engine failed: {0}")]
    EngineFailed(String),

    /// Engine is not installed or not executable
    #[error("Speech engine not available: {0}")]
    NotAvailable(String),

    /// Engine did not finish in time
    #[error("Speech engine timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SpeechError {
    /// Whether the caller's input caused this error
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidAudio(_) | Self::InvalidText(_))
    }

    pub(crate) fn storage(context: &str, err: &std::io::Error) -> Self {
        Self::Storage(format!("{context}: {err}"))
    }
}
