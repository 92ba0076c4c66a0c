//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech engine adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, SpeechArtifact, Transcription};

/// Port for Speech-to-Text (STT) implementations
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// Fails with `InvalidAudio` on empty or undecodable input, `Storage`
    /// when the scratch file cannot be written, and `MissingField` when the
    /// engine output has no text. An empty transcription is never
    /// substituted for a missing one.
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError>;

    /// Check if the engine and its model are installed
    async fn is_available(&self) -> bool;

    /// Name of the loaded model
    fn model_name(&self) -> &str;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize speech and return the written audio file
    ///
    /// The engine process has exited and the file is complete when this
    /// returns. The caller owns the file and must remove it.
    async fn synthesize(&self, text: &str) -> Result<SpeechArtifact, SpeechError>;

    /// Check if the engine and its voice are installed
    async fn is_available(&self) -> bool;
}
