//! Types for speech processing
//!
//! Audio payloads, transcriptions, and synthesized artifacts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use domain::AudioFormat;

/// Container for audio data with its format
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Raw audio bytes
    data: Vec<u8>,
    /// Audio format
    format: AudioFormat,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the audio format
    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the size of the audio data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<domain::AudioBlob> for AudioData {
    fn from(blob: domain::AudioBlob) -> Self {
        let format = blob.format();
        Self::new(blob.into_bytes(), format)
    }
}

/// Result of speech-to-text transcription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Transcribed text
    pub text: String,
    /// Detected or requested language (ISO 639-1 code)
    pub language: Option<String>,
}

impl Transcription {
    /// Create a transcription
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }

    /// Set the language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A fully written audio file produced by synthesis
///
/// The file is owned by whoever holds this value; nothing removes it
/// automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechArtifact {
    path: PathBuf,
    format: AudioFormat,
}

impl SpeechArtifact {
    pub(crate) const fn new(path: PathBuf, format: AudioFormat) -> Self {
        Self { path, format }
    }

    /// Location of the audio file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Consume and return the path
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_data_accessors() {
        let audio = AudioData::new(vec![1, 2, 3], AudioFormat::Webm);
        assert_eq!(audio.size_bytes(), 3);
        assert!(!audio.is_empty());
        assert_eq!(audio.format(), AudioFormat::Webm);
        assert_eq!(audio.into_data(), vec![1, 2, 3]);
    }

    #[test]
    fn audio_data_from_blob() {
        let blob = domain::AudioBlob::new(vec![9, 9], AudioFormat::Mp3).unwrap();
        let audio = AudioData::from(blob);
        assert_eq!(audio.data(), &[9, 9]);
        assert_eq!(audio.format(), AudioFormat::Mp3);
    }

    #[test]
    fn transcription_builder() {
        let t = Transcription::new("hello").with_language("en");
        assert_eq!(t.text, "hello");
        assert_eq!(t.language.as_deref(), Some("en"));
    }

    #[test]
    fn artifact_keeps_path() {
        let artifact = SpeechArtifact::new(PathBuf::from("/tmp/a.wav"), AudioFormat::Wav);
        assert_eq!(artifact.path(), Path::new("/tmp/a.wav"));
        assert_eq!(artifact.into_path(), PathBuf::from("/tmp/a.wav"));
    }
}
