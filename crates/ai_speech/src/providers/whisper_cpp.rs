//! Whisper.cpp Local Speech-to-Text Provider
//!
//! Implements `SpeechToText` using the whisper.cpp CLI for local transcription.
//!
//! # Prerequisites
//!
//! - whisper.cpp's `whisper-cli` must be installed and available in PATH
//! - A GGML model file (e.g., ggml-base.bin)
//!
//! ```bash
//! git clone https://github.com/ggerganov/whisper.cpp
//! cd whisper.cpp && cmake -B build && cmake --build build -j
//! ./models/download-ggml-model.sh base
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

use crate::config::LocalSttConfig;
use crate::converter::AudioConverter;
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::scratch::ScratchSpace;
use crate::types::{AudioData, AudioFormat, Transcription};

/// Local STT provider using whisper.cpp
#[derive(Debug, Clone)]
pub struct WhisperCppProvider {
    config: LocalSttConfig,
    scratch: ScratchSpace,
    converter: AudioConverter,
}

/// Shape of the file written by `whisper-cli -oj`
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    result: Option<WhisperResult>,
    #[serde(default)]
    transcription: Option<Vec<WhisperSegment>>,
}

#[derive(Debug, Deserialize)]
struct WhisperResult {
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    #[serde(default)]
    text: Option<String>,
}

impl WhisperOutput {
    /// Join segment texts; a missing field is an error, not an empty string
    fn into_transcription(self) -> Result<Transcription, SpeechError> {
        let segments = self
            .transcription
            .ok_or_else(|| SpeechError::MissingField("transcription".to_string()))?;

        let mut text = String::new();
        for segment in segments {
            let part = segment
                .text
                .ok_or_else(|| SpeechError::MissingField("transcription[].text".to_string()))?;
            text.push_str(&part);
        }

        let transcription = Transcription::new(text.trim());
        Ok(match self.result.and_then(|r| r.language) {
            Some(language) => transcription.with_language(language),
            None => transcription,
        })
    }
}

impl WhisperCppProvider {
    /// Create a new whisper.cpp provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(
        config: LocalSttConfig,
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

    /// Get the whisper.cpp executable path
    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Get the model path
    fn model(&self) -> &Path {
        &self.config.model_path
    }

    /// Run whisper.cpp on a WAV file and return the parsed JSON output
    #[instrument(skip(self, audio_path), fields(model = %self.model().display()))]
    async fn run_whisper(&self, audio_path: &Path) -> Result<Transcription, SpeechError> {
        let output_stem: PathBuf = audio_path.with_extension("");
        let json_path = audio_path.with_extension("json");

        let mut cmd = Command::new(self.executable());
        cmd.arg("-m")
            .arg(self.model())
            .arg("-f")
            .arg(audio_path)
            .arg("-t")
            .arg(self.config.threads.to_string())
            .arg("-np")
            .arg("-oj")
            .arg("-of")
            .arg(&output_stem);

        if let Some(ref lang) = self.config.default_language {
            cmd.arg("-l").arg(lang);
        }

        cmd.stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(?cmd, "Running whisper.cpp");

        let result = tokio::time::timeout(
            Duration::from_millis(self.config.timeout_ms),
            cmd.output(),
        )
        .await;

        let parsed = match result {
            Err(_) => Err(SpeechError::Timeout(self.config.timeout_ms)),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SpeechError::NotAvailable(format!(
                    "whisper.cpp not found at '{}'. Please install whisper.cpp.",
                    self.executable().display()
                )))
            },
            Ok(Err(e)) => Err(SpeechError::EngineFailed(format!(
                "Failed to run whisper.cpp: {e}"
            ))),
            Ok(Ok(output)) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                error!(status = %output.status, stderr = %stderr.trim(), "whisper.cpp failed");
                Err(SpeechError::EngineFailed(format!(
                    "whisper.cpp exited with status {}: {}",
                    output.status,
                    stderr.trim()
                )))
            },
            Ok(Ok(_)) => Self::read_output(&json_path).await,
        };

        // The JSON file sits next to the scratch input and is not tracked by it
        match tokio::fs::remove_file(&json_path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                warn!(
                    path = %json_path.display(),
                    error = %e,
                    "Failed to remove whisper.cpp output"
                );
            },
            _ => {},
        }

        parsed
    }

    async fn read_output(json_path: &Path) -> Result<Transcription, SpeechError> {
        let raw = tokio::fs::read_to_string(json_path)
            .await
            .map_err(|e| SpeechError::storage("Failed to read whisper.cpp output", &e))?;

        let output: WhisperOutput = serde_json::from_str(&raw).map_err(|e| {
            warn!(error = %e, "whisper.cpp output is not valid JSON");
            SpeechError::EngineFailed(format!("Unreadable whisper.cpp output: {e}"))
        })?;

        output.into_transcription().inspect_err(|e| {
            warn!(error = %e, "whisper.cpp output is missing the transcription text");
        })
    }
}

#[async_trait]
impl SpeechToText for WhisperCppProvider {
    #[instrument(skip(self, audio), fields(format = %audio.format(), size = audio.size_bytes()))]
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        let wav = self.converter.to_recognizer_input(audio).await?;
        let input = self.scratch.write(wav.data(), AudioFormat::Wav).await?;

        let transcription = self.run_whisper(input.path()).await?;

        if transcription.text.is_empty() {
            warn!("whisper.cpp returned empty transcription");
        }
        debug!(chars = transcription.text.len(), "Transcription completed");

        Ok(transcription)
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

        let model_exists = self.model().exists();

        debug!(executable_exists, model_exists, "whisper.cpp availability");

        executable_exists && model_exists
    }

    fn model_name(&self) -> &str {
        self.model()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("whisper.cpp")
    }
}
