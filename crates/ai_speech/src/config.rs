//! Configuration for speech processing

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::AudioFormat;

/// Configuration for the speech engines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Speech-to-text engine
    #[serde(default)]
    pub stt: LocalSttConfig,

    /// Text-to-speech engine
    #[serde(default)]
    pub tts: LocalTtsConfig,

    /// FFmpeg binary used for format conversion
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Maximum time a single FFmpeg conversion may run
    #[serde(default = "default_ffmpeg_timeout_ms")]
    pub ffmpeg_timeout_ms: u64,

    /// Directory for scratch files (system temp dir when unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

/// Configuration for the whisper.cpp recognizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalSttConfig {
    /// whisper.cpp CLI executable
    #[serde(default = "default_whisper_executable")]
    pub executable_path: PathBuf,

    /// GGML model file
    #[serde(default = "default_whisper_model")]
    pub model_path: PathBuf,

    /// Number of threads
    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Language hint (ISO 639-1); auto-detect when unset
    #[serde(default)]
    pub default_language: Option<String>,

    /// Maximum time the engine may run
    #[serde(default = "default_engine_timeout_ms")]
    pub timeout_ms: u64,
}

/// Configuration for the Piper synthesizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalTtsConfig {
    /// Piper executable
    #[serde(default = "default_piper_executable")]
    pub executable_path: PathBuf,

    /// Voice model (.onnx, with its .onnx.json next to it)
    #[serde(default = "default_piper_model")]
    pub model_path: PathBuf,

    /// Speaking rate; larger is slower
    #[serde(default = "default_length_scale")]
    pub length_scale: f32,

    /// Seconds of silence between sentences
    #[serde(default = "default_sentence_silence")]
    pub sentence_silence: f32,

    /// Format of the returned artifact; anything but WAV goes through FFmpeg
    #[serde(default = "default_output_format")]
    pub output_format: AudioFormat,

    /// Maximum time the engine may run
    #[serde(default = "default_engine_timeout_ms")]
    pub timeout_ms: u64,
}

fn models_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voice-assistant")
        .join("models")
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

const fn default_ffmpeg_timeout_ms() -> u64 {
    60_000
}

fn default_whisper_executable() -> PathBuf {
    PathBuf::from("whisper-cli")
}

fn default_whisper_model() -> PathBuf {
    models_dir().join("ggml-base.bin")
}

fn default_piper_executable() -> PathBuf {
    PathBuf::from("piper")
}

fn default_piper_model() -> PathBuf {
    models_dir().join("en_US-lessac-medium.onnx")
}

const fn default_threads() -> u32 {
    4
}

const fn default_engine_timeout_ms() -> u64 {
    120_000
}

const fn default_length_scale() -> f32 {
    1.0
}

const fn default_sentence_silence() -> f32 {
    0.2
}

const fn default_output_format() -> AudioFormat {
    AudioFormat::Wav
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            stt: LocalSttConfig::default(),
            tts: LocalTtsConfig::default(),
            ffmpeg_path: default_ffmpeg_path(),
            ffmpeg_timeout_ms: default_ffmpeg_timeout_ms(),
            scratch_dir: None,
        }
    }
}

impl SpeechConfig {
    /// FFmpeg conversion timeout
    #[must_use]
    pub const fn ffmpeg_timeout(&self) -> Duration {
        Duration::from_millis(self.ffmpeg_timeout_ms)
    }
}

impl Default for LocalSttConfig {
    fn default() -> Self {
        Self {
            executable_path: default_whisper_executable(),
            model_path: default_whisper_model(),
            threads: default_threads(),
            default_language: None,
            timeout_ms: default_engine_timeout_ms(),
        }
    }
}

impl Default for LocalTtsConfig {
    fn default() -> Self {
        Self {
            executable_path: default_piper_executable(),
            model_path: default_piper_model(),
            length_scale: default_length_scale(),
            sentence_silence: default_sentence_silence(),
            output_format: default_output_format(),
            timeout_ms: default_engine_timeout_ms(),
        }
    }
}

impl LocalSttConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("whisper.cpp executable path must not be empty".to_string());
        }
        if self.threads == 0 {
            return Err("Thread count must be greater than 0".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl LocalTtsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("Piper executable path must not be empty".to_string());
        }
        if !(0.1..=5.0).contains(&self.length_scale) {
            return Err(format!(
                "Length scale must be between 0.1 and 5.0, got {}",
                self.length_scale
            ));
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
