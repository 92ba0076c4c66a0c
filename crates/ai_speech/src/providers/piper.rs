//! Piper Local Text-to-Speech Provider
//!
//! Implements `TextToSpeech` using the Piper CLI for local speech synthesis.
//!
//! # Prerequisites
//!
//! - Piper must be installed and available in PATH
//! - A voice model (.onnx) with its config (.onnx.json) next to it
//!
//! ```bash
//! mkdir -p ~/.local/share/voice-assistant/models
//! cd ~/.local/share/voice-assistant/models
//! wget https://huggingface.co/rhasspy/piper-voices/resolve/main/en/en_US/lessac/medium/en_US-lessac-medium.onnx
//! wget https://huggingface.co/rhasspy/piper-voices/resolve/main/en/en_US/lessac/medium/en_US-lessac-medium.onnx.json
//! ```

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

use crate::config::LocalTtsConfig;
use crate::converter::AudioConverter;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::scratch::ScratchSpace;
use crate::types::{AudioData, AudioFormat, SpeechArtifact};

/// Local TTS provider using Piper
#[derive(Debug, Clone)]
pub struct PiperProvider {
    config: LocalTtsConfig,
    scratch: ScratchSpace,
    converter: AudioConverter,
}

impl PiperProvider {
    /// Create a new Piper provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(
        config: LocalTtsConfig,
        scratch: ScratchSpace,
        converter: AudioConverter,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self {
            config,
            scratch,
            converter,
        })
    }

    /// Get the Piper executable path
    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Voice model name, derived from the model file
    pub fn voice_name(&self) -> &str {
        self.config
            .model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("piper")
    }

    /// Run Piper and wait until it has written `output`
    #[instrument(
        skip(self, text, output),
        fields(voice = %self.voice_name(), text_len = text.len())
    )]
    async fn run_piper(&self, text: &str, output: &Path) -> Result<(), SpeechError> {
        let mut cmd = Command::new(self.executable());

        cmd.arg("--model")
            .arg(&self.config.model_path)
            .arg("--output_file")
            .arg(output)
            .arg("--length_scale")
            .arg(self.config.length_scale.to_string())
            .arg("--sentence_silence")
            .arg(self.config.sentence_silence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(?cmd, "Running piper");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "Piper not found at '{}'. Please install Piper.",
                    self.executable().display()
                ))
            } else {
                SpeechError::EngineFailed(format!("Failed to run piper: {e}"))
            }
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(|e| {
                SpeechError::EngineFailed(format!("Failed to write to piper stdin: {e}"))
            })?;
            // stdin is dropped here, closing it
        }

        let result = tokio::time::timeout(
            Duration::from_millis(self.config.timeout_ms),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| SpeechError::Timeout(self.config.timeout_ms))?
        .map_err(|e| SpeechError::EngineFailed(format!("Failed to wait for piper: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!(status = %result.status, stderr = %stderr.trim(), "Piper failed");
            return Err(SpeechError::EngineFailed(format!(
                "Piper exited with status {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        let size = tokio::fs::metadata(output)
            .await
            .map_err(|e| SpeechError::storage("Failed to inspect piper output", &e))?
            .len();
        if size == 0 {
            warn!("Piper produced empty output");
            return Err(SpeechError::EngineFailed(
                "Piper produced empty output".to_string(),
            ));
        }

        Ok(())
    }

    /// Encode the WAV into the configured output format
    async fn encode(&self, wav: NamedTempFile) -> Result<NamedTempFile, SpeechError> {
        let format = self.config.output_format;
        if format == AudioFormat::Wav {
            return Ok(wav);
        }

        let data = tokio::fs::read(wav.path())
            .await
            .map_err(|e| SpeechError::storage("Failed to read piper output", &e))?;
        let converted = self
            .converter
            .convert(&AudioData::new(data, AudioFormat::Wav), format)
            .await?;

        self.scratch.write(converted.data(), format).await
    }
}

#[async_trait]
impl TextToSpeech for PiperProvider {
    #[instrument(
        skip(self, text),
        fields(text_len = text.len(), format = %self.config.output_format)
    )]
    async fn synthesize(&self, text: &str) -> Result<SpeechArtifact, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::InvalidText(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        let wav = self.scratch.reserve(AudioFormat::Wav)?;
        self.run_piper(text, wav.path()).await?;

        // Until `keep`, every early return removes the scratch files
        let encoded = self.encode(wav).await?;
        let path = ScratchSpace::keep(encoded)?;

        debug!(path = %path.display(), "Synthesis completed");

        Ok(SpeechArtifact::new(path, self.config.output_format))
    }

    async fn is_available(&self) -> bool {
        let executable_exists = self.executable().exists()
            || Command::new(self.executable())
                .arg("--help")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .is_ok();

        let model_exists = self.config.model_path.exists();

        debug!(executable_exists, model_exists, "Piper availability");

        executable_exists && model_exists
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn test_config() -> LocalTtsConfig {
        LocalTtsConfig {
            executable_path: PathBuf::from("piper"),
            model_path: PathBuf::from("/models/en_US-lessac-medium.onnx"),
            ..Default::default()
        }
    }

    fn provider(config: LocalTtsConfig) -> PiperProvider {
        PiperProvider::new(config, ScratchSpace::default(), AudioConverter::default()).unwrap()
    }

    #[test]
    fn voice_name_extracts_from_path() {
        assert_eq!(provider(test_config()).voice_name(), "en_US-lessac-medium");
    }

    #[tokio::test]
    async fn empty_text_is_invalid() {
        let err = provider(test_config()).synthesize("  \n").await.unwrap_err();
        assert!(matches!(err, SpeechError::InvalidText(_)));
    }

    #[tokio::test]
    async fn missing_executable_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let config = LocalTtsConfig {
            executable_path: PathBuf::from("/nonexistent/piper"),
            ..test_config()
        };
        let p = PiperProvider::new(
            config,
            ScratchSpace::new(Some(dir.path().to_path_buf())),
            AudioConverter::default(),
        )
        .unwrap();

        assert!(!p.is_available().await);
        let err = p.synthesize("Hello").await.unwrap_err();
        assert!(matches!(err, SpeechError::NotAvailable(_)));

        // No artifact left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
