//! Audio format converter
//!
//! Brings browser and phone recordings (WebM, OGG/Opus, MP3, ...) into the
//! 16 kHz mono WAV that whisper.cpp expects, and encodes synthesized WAV
//! into other output formats.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::SpeechError;
use crate::types::{AudioData, AudioFormat};

/// Audio converter for transforming between audio formats
///
/// Uses FFmpeg for audio conversion. FFmpeg must be installed on the system.
#[derive(Debug, Clone)]
pub struct AudioConverter {
    ffmpeg_path: String,
    timeout: Duration,
}

impl Default for AudioConverter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl AudioConverter {
    /// Create a converter using the given FFmpeg binary
    #[must_use]
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Limit how long a single conversion may run
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if FFmpeg is available on the system
    #[instrument(skip(self))]
    pub async fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|status| status.success())
    }

    /// Convert to 16 kHz mono PCM WAV unless the audio already is WAV
    pub async fn to_recognizer_input(&self, audio: AudioData) -> Result<AudioData, SpeechError> {
        if audio.format() == AudioFormat::Wav {
            return Ok(audio);
        }
        self.convert(&audio, AudioFormat::Wav).await
    }

    /// Convert audio data to the target format
    ///
    /// A non-zero FFmpeg exit means the input could not be decoded and is
    /// reported as `InvalidAudio`.
    #[instrument(skip(self, audio), fields(
        input_format = %audio.format(),
        target_format = %target_format,
        size = audio.size_bytes()
    ))]
    pub async fn convert(
        &self,
        audio: &AudioData,
        target_format: AudioFormat,
    ) -> Result<AudioData, SpeechError> {
        if audio.format() == target_format {
            debug!("Audio already in target format, skipping conversion");
            return Ok(audio.clone());
        }

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(["-hide_banner", "-loglevel", "error", "-i", "pipe:0"]);
        Self::add_format_options(&mut cmd, target_format);
        cmd.args(["-f", Self::format_to_ffmpeg(target_format), "-y", "pipe:1"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "FFmpeg not found at '{}'. Please install FFmpeg.",
                    self.ffmpeg_path
                ))
            } else {
                SpeechError::EngineFailed(format!("Failed to spawn FFmpeg: {e}"))
            }
        })?;

        // Feed stdin while draining stdout; FFmpeg stops reading once its
        // output pipe is full.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // FFmpeg may close stdin early on undecodable input; the exit
                // status reports that case.
                if let Err(e) = stdin.write_all(audio.data()).await {
                    warn!(error = %e, "FFmpeg closed stdin early");
                }
            }
        };

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let run = async move { tokio::join!(feed, child.wait_with_output()).1 };

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                warn!(timeout_ms, "FFmpeg conversion timed out");
                SpeechError::Timeout(timeout_ms)
            })?
            .map_err(|e| SpeechError::EngineFailed(format!("Failed to wait for FFmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::InvalidAudio(format!(
                "FFmpeg could not decode {} input: {}",
                audio.format(),
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(SpeechError::InvalidAudio(
                "FFmpeg produced empty output".to_string(),
            ));
        }

        debug!(output_size = output.stdout.len(), "Conversion successful");

        Ok(AudioData::new(output.stdout, target_format))
    }

    /// Get the FFmpeg muxer name for an audio format
    const fn format_to_ffmpeg(format: AudioFormat) -> &'static str {
        match format {
            AudioFormat::Opus => "opus",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::Webm => "webm",
            AudioFormat::M4a => "ipod",
        }
    }

    /// Add format-specific encoding options
    fn add_format_options(cmd: &mut Command, format: AudioFormat) {
        match format {
            AudioFormat::Mp3 => {
                cmd.args(["-codec:a", "libmp3lame", "-q:a", "2"]);
            },
            AudioFormat::Opus => {
                cmd.args(["-codec:a", "libopus", "-application", "voip", "-b:a", "32k"]);
            },
            AudioFormat::Wav => {
                cmd.args(["-codec:a", "pcm_s16le", "-ar", "16000", "-ac", "1"]);
            },
            AudioFormat::Flac => {
                cmd.args(["-codec:a", "flac", "-compression_level", "5"]);
            },
            AudioFormat::M4a => {
                cmd.args(["-codec:a", "aac", "-b:a", "128k"]);
            },
            AudioFormat::Ogg | AudioFormat::Webm => {
                cmd.args(["-codec:a", "libvorbis", "-q:a", "4"]);
            },
        }
    }
}
