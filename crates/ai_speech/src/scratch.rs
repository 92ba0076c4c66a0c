//! Scratch files bridging in-memory audio and path-oriented engine CLIs
//!
//! Every file gets a fresh unique name. Files are removed when their handle
//! drops unless ownership is handed off with [`ScratchSpace::keep`].

use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::error::SpeechError;
use crate::types::AudioFormat;

const PREFIX: &str = "voice-assistant-";

/// Directory that holds scratch files
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    dir: PathBuf,
}

impl Default for ScratchSpace {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ScratchSpace {
    /// Use `dir`, or the system temp directory when `None`
    #[must_use]
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir: dir.unwrap_or_else(std::env::temp_dir),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create an empty, uniquely named file with the format's extension
    pub fn reserve(&self, format: AudioFormat) -> Result<NamedTempFile, SpeechError> {
        let suffix = format!(".{}", format.extension());
        Builder::new()
            .prefix(PREFIX)
            .suffix(&suffix)
            .tempfile_in(&self.dir)
            .map_err(|e| SpeechError::storage("Failed to create scratch file", &e))
    }

    /// Persist `bytes` to a fresh scratch file
    pub async fn write(
        &self,
        bytes: &[u8],
        format: AudioFormat,
    ) -> Result<NamedTempFile, SpeechError> {
        let file = self.reserve(format)?;
        tokio::fs::write(file.path(), bytes)
            .await
            .map_err(|e| SpeechError::storage("Failed to write scratch file", &e))?;
        debug!(path = %file.path().display(), size = bytes.len(), "Wrote scratch file");
        Ok(file)
    }

    /// Stop tracking the file so it outlives its handle
    pub fn keep(file: NamedTempFile) -> Result<PathBuf, SpeechError> {
        file.into_temp_path()
            .keep()
            .map_err(|e| SpeechError::storage("Failed to keep scratch file", &e.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_creates_unique_files_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(Some(dir.path().to_path_buf()));

        let a = scratch.write(b"abc", AudioFormat::Webm).await.unwrap();
        let b = scratch.write(b"abc", AudioFormat::Webm).await.unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(a.path().extension().and_then(|e| e.to_str()), Some("webm"));
        assert_eq!(std::fs::read(a.path()).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn dropped_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(Some(dir.path().to_path_buf()));

        let file = scratch.write(b"x", AudioFormat::Wav).await.unwrap();
        let path = file.path().to_path_buf();
        drop(file);

        assert!(!path.exists());
    }

    #[test]
    fn kept_file_survives() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(Some(dir.path().to_path_buf()));

        let file = scratch.reserve(AudioFormat::Wav).unwrap();
        let path = ScratchSpace::keep(file).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn missing_directory_is_storage_error() {
        let scratch = ScratchSpace::new(Some(PathBuf::from("/nonexistent/scratch/dir")));
        let err = scratch.reserve(AudioFormat::Wav).unwrap_err();
        assert!(matches!(err, SpeechError::Storage(_)));
    }
}
