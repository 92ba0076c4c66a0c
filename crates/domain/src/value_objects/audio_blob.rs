//! Opaque audio bytes with their format

use crate::errors::DomainError;
use crate::value_objects::AudioFormat;

/// An uploaded recording, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    bytes: Vec<u8>,
    format: AudioFormat,
}

impl AudioBlob {
    /// Wrap uploaded bytes, rejecting zero-length input
    pub fn new(bytes: impl Into<Vec<u8>>, format: AudioFormat) -> Result<Self, DomainError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(DomainError::EmptyAudio);
        }
        Ok(Self { bytes, format })
    }

    /// Wrap an upload whose format still has to be classified
    pub fn from_upload(
        bytes: impl Into<Vec<u8>>,
        mime: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, DomainError> {
        let format = AudioFormat::detect(mime, file_name).ok_or_else(|| {
            DomainError::UnsupportedAudioFormat(
                mime.or(file_name).unwrap_or("unknown").to_string(),
            )
        })?;
        Self::new(bytes, format)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_bytes() {
        let err = AudioBlob::new(Vec::new(), AudioFormat::Wav).unwrap_err();
        assert!(matches!(err, DomainError::EmptyAudio));
    }

    #[test]
    fn classifies_upload() {
        let blob = AudioBlob::from_upload(vec![1, 2, 3], None, Some("rec.webm")).unwrap();
        assert_eq!(blob.format(), AudioFormat::Webm);
        assert_eq!(blob.len(), 3);
    }

    #[test]
    fn unknown_type_names_mime() {
        let err = AudioBlob::from_upload(vec![1], Some("text/plain"), None).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported audio format: text/plain");
    }

    #[test]
    fn empty_upload_checked_after_format() {
        let err = AudioBlob::from_upload(Vec::new(), Some("audio/wav"), None).unwrap_err();
        assert!(matches!(err, DomainError::EmptyAudio));
    }
}
