//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Prompt was empty or whitespace-only
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    /// Provider name outside the supported set
    #[error("Unsupported provider: {0}. Use 'local-inference' or 'cloud-api'")]
    UnknownProvider(String),

    /// Uploaded audio contained no bytes
    #[error("Audio upload is empty")]
    EmptyAudio,

    /// Audio type could not be classified
    #[error("Unsupported audio format: {0}")]
    UnsupportedAudioFormat(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Whether this error was caused by caller input rather than configuration
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPrompt
                | Self::EmptyAudio
                | Self::UnsupportedAudioFormat(_)
                | Self::ValidationError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prompt_error_message() {
        let err = DomainError::EmptyPrompt;
        assert_eq!(err.to_string(), "Prompt cannot be empty");
    }

    #[test]
    fn unknown_provider_error_message() {
        let err = DomainError::UnknownProvider("openai".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported provider: openai. Use 'local-inference' or 'cloud-api'"
        );
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("field is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: field is required");
    }

    #[test]
    fn unknown_provider_is_not_input_error() {
        assert!(!DomainError::UnknownProvider("x".to_string()).is_input_error());
        assert!(DomainError::EmptyPrompt.is_input_error());
        assert!(DomainError::EmptyAudio.is_input_error());
    }

    #[test]
    fn unsupported_audio_message() {
        let err = DomainError::UnsupportedAudioFormat("video/mp4".to_string());
        assert_eq!(err.to_string(), "Unsupported audio format: video/mp4");
    }
}
