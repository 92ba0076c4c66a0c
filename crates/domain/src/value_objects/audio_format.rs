//! Audio format of an uploaded recording or synthesized utterance

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// WebM container (browser `MediaRecorder` default)
    Webm,
    /// WAV format (uncompressed PCM)
    Wav,
    /// MP3 format
    Mp3,
    /// OGG container
    Ogg,
    /// Opus codec
    Opus,
    /// FLAC format (lossless)
    Flac,
    /// M4A/AAC format
    M4a,
}

impl AudioFormat {
    /// Get the MIME type for this format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Opus => "audio/opus",
            Self::Flac => "audio/flac",
            Self::M4a => "audio/mp4",
        }
    }

    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Opus => "opus",
            Self::Flac => "flac",
            Self::M4a => "m4a",
        }
    }

    /// Parse from MIME type, ignoring parameters like `; codecs=opus`
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let base = mime.split(';').next().unwrap_or(mime).trim();
        match base.to_ascii_lowercase().as_str() {
            "audio/webm" | "video/webm" => Some(Self::Webm),
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/ogg" => {
                if mime.contains("codecs=opus") {
                    Some(Self::Opus)
                } else {
                    Some(Self::Ogg)
                }
            },
            "audio/opus" => Some(Self::Opus),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Parse from a bare extension (`wav`, `.wav`)
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "webm" => Some(Self::Webm),
            "wav" | "wave" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "ogg" | "oga" => Some(Self::Ogg),
            "opus" => Some(Self::Opus),
            "flac" => Some(Self::Flac),
            "m4a" | "mp4" | "aac" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Classify an upload by MIME type first, then by file name extension
    ///
    /// Generic MIME types such as `application/octet-stream` fall through to
    /// the extension.
    #[must_use]
    pub fn detect(mime: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        mime.and_then(Self::from_mime_type).or_else(|| {
            file_name
                .and_then(|name| name.rsplit_once('.'))
                .and_then(|(_, ext)| Self::from_extension(ext))
        })
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_with_parameters() {
        assert_eq!(
            AudioFormat::from_mime_type("audio/webm;codecs=opus"),
            Some(AudioFormat::Webm)
        );
        assert_eq!(
            AudioFormat::from_mime_type("audio/ogg; codecs=opus"),
            Some(AudioFormat::Opus)
        );
        assert_eq!(AudioFormat::from_mime_type("Audio/WAV"), Some(AudioFormat::Wav));
    }

    #[test]
    fn unknown_mime_is_none() {
        assert!(AudioFormat::from_mime_type("text/plain").is_none());
        assert!(AudioFormat::from_mime_type("application/octet-stream").is_none());
    }

    #[test]
    fn extensions() {
        assert_eq!(AudioFormat::from_extension(".MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("flac"), Some(AudioFormat::Flac));
        assert!(AudioFormat::from_extension("txt").is_none());
    }

    #[test]
    fn detect_prefers_mime_then_extension() {
        assert_eq!(
            AudioFormat::detect(Some("audio/wav"), Some("clip.mp3")),
            Some(AudioFormat::Wav)
        );
        assert_eq!(
            AudioFormat::detect(Some("application/octet-stream"), Some("clip.webm")),
            Some(AudioFormat::Webm)
        );
        assert_eq!(AudioFormat::detect(None, Some("noext")), None);
        assert_eq!(AudioFormat::detect(None, None), None);
    }

    #[test]
    fn display_is_extension() {
        assert_eq!(AudioFormat::M4a.to_string(), "m4a");
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
    }
}
