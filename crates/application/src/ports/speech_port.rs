//! Speech ports - Interfaces for speech-to-text and text-to-speech

use std::path::PathBuf;

use async_trait::async_trait;
use domain::{AudioBlob, AudioFormat};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of a transcription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResult {
    /// Transcribed text
    pub text: String,
    /// Detected language code (e.g., "en", "de")
    pub detected_language: Option<String>,
}

/// A synthesized utterance written to disk
///
/// Whoever holds this owns the file and is responsible for removing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedSpeech {
    /// Location of the fully written audio file
    pub path: PathBuf,
    /// Format of the audio
    pub format: AudioFormat,
}

/// Port for speech-to-text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Transcribe an uploaded recording
    async fn transcribe(&self, audio: AudioBlob) -> Result<TranscriptionResult, ApplicationError>;

    /// Check if the recognition engine is installed
    async fn is_available(&self) -> bool;
}

/// Port for text-to-speech
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    /// Synthesize `text` into an audio file
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech, ApplicationError>;

    /// Check if the synthesis engine is installed
    async fn is_available(&self) -> bool;
}
