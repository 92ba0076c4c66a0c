//! Speech adapter - Implements the transcription and synthesis ports using
//! the ai_speech crate

use std::sync::Arc;

use ai_speech::{
    AudioConverter, AudioData, PiperProvider, ScratchSpace, SpeechConfig, SpeechError,
    SpeechToText, TextToSpeech, WhisperCppProvider,
};
use application::error::ApplicationError;
use application::ports::{
    SynthesisPort, SynthesizedSpeech, TranscriptionPort, TranscriptionResult,
};
use async_trait::async_trait;
use domain::AudioBlob;
use tracing::{debug, instrument};

/// Adapter for the local speech engines
pub struct SpeechAdapter {
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("stt", &self.stt.model_name())
            .field("tts", &"<TextToSpeech>")
            .finish()
    }
}

impl SpeechAdapter {
    /// Create a speech adapter backed by whisper.cpp and Piper
    ///
    /// # Errors
    ///
    /// Returns an error if either engine's configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let scratch = ScratchSpace::new(config.scratch_dir.clone());
        let converter =
            AudioConverter::new(config.ffmpeg_path.clone()).with_timeout(config.ffmpeg_timeout());

        let stt = WhisperCppProvider::new(config.stt, scratch.clone(), converter.clone())
            .map_err(Self::map_error)?;
        let tts = PiperProvider::new(config.tts, scratch, converter).map_err(Self::map_error)?;

        Ok(Self::with_engines(Arc::new(stt), Arc::new(tts)))
    }

    /// Create a speech adapter over arbitrary engines
    #[must_use]
    pub fn with_engines(stt: Arc<dyn SpeechToText>, tts: Arc<dyn TextToSpeech>) -> Self {
        Self { stt, tts }
    }

    /// Map speech error to application error
    fn map_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            e @ (SpeechError::InvalidAudio(_) | SpeechError::InvalidText(_)) => {
                ApplicationError::Validation(e.to_string())
            },
            e @ SpeechError::NotAvailable(_) => ApplicationError::Connectivity(e.to_string()),
            e @ (SpeechError::EngineFailed(_) | SpeechError::Timeout(_)) => {
                ApplicationError::BackendRejected(e.to_string())
            },
            e @ SpeechError::MissingField(_) => ApplicationError::MalformedResponse(e.to_string()),
            SpeechError::Storage(e) => ApplicationError::Storage(e),
        }
    }
}

#[async_trait]
impl TranscriptionPort for SpeechAdapter {
    #[instrument(skip(self, audio), fields(format = %audio.format(), size = audio.len()))]
    async fn transcribe(&self, audio: AudioBlob) -> Result<TranscriptionResult, ApplicationError> {
        let transcription = self
            .stt
            .transcribe(AudioData::from(audio))
            .await
            .map_err(Self::map_error)?;

        debug!(
            chars = transcription.text.len(),
            language = ?transcription.language,
            "Transcription complete"
        );

        Ok(TranscriptionResult {
            text: transcription.text,
            detected_language: transcription.language,
        })
    }

    async fn is_available(&self) -> bool {
        self.stt.is_available().await
    }
}

#[async_trait]
impl SynthesisPort for SpeechAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech, ApplicationError> {
        let artifact = self.tts.synthesize(text).await.map_err(Self::map_error)?;
        let format = artifact.format();

        Ok(SynthesizedSpeech {
            path: artifact.into_path(),
            format,
        })
    }

    async fn is_available(&self) -> bool {
        self.tts.is_available().await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ai_speech::{LocalSttConfig, SpeechArtifact, Transcription};
    use application::ErrorKind;
    use domain::AudioFormat;

    use super::*;

    /// Recognizer returning fixed text, or no text field at all
    struct FixedStt(Option<&'static str>);

    #[async_trait]
    impl SpeechToText for FixedStt {
        async fn transcribe(&self, _audio: AudioData) -> Result<Transcription, SpeechError> {
            self.0
                .map(|text| Transcription::new(text).with_language("en"))
                .ok_or_else(|| SpeechError::MissingField("transcription".to_string()))
        }

        async fn is_available(&self) -> bool {
            self.0.is_some()
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingTts;

    #[async_trait]
    impl TextToSpeech for FailingTts {
        async fn synthesize(&self, _text: &str) -> Result<SpeechArtifact, SpeechError> {
            Err(SpeechError::Storage("Failed to create scratch file: denied".to_string()))
        }

        async fn is_available(&self) -> bool {
            false
        }
    }

    fn blob() -> AudioBlob {
        AudioBlob::new(vec![1, 2, 3], AudioFormat::Wav).unwrap()
    }

    #[tokio::test]
    async fn transcription_maps_fields() {
        let adapter = SpeechAdapter::with_engines(
            Arc::new(FixedStt(Some("Where is the milk?"))),
            Arc::new(FailingTts),
        );

        let result = adapter.transcribe(blob()).await.unwrap();

        assert_eq!(result.text, "Where is the milk?");
        assert_eq!(result.detected_language.as_deref(), Some("en"));
        assert!(TranscriptionPort::is_available(&adapter).await);
        assert!(!SynthesisPort::is_available(&adapter).await);
    }

    #[tokio::test]
    async fn missing_field_is_malformed_response() {
        let adapter = SpeechAdapter::with_engines(
            Arc::new(FixedStt(None)),
            Arc::new(FailingTts),
        );

        let err = adapter.transcribe(blob()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn storage_failure_is_storage_kind() {
        let adapter = SpeechAdapter::with_engines(
            Arc::new(FixedStt(Some("unused"))),
            Arc::new(FailingTts),
        );

        let err = adapter.synthesize("Hello").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.is_retryable());
    }

    #[test]
    fn error_kinds_follow_taxonomy() {
        let cases = [
            (SpeechError::InvalidAudio("empty".into()), ErrorKind::Validation),
            (SpeechError::InvalidText("empty".into()), ErrorKind::Validation),
            (SpeechError::NotAvailable("piper".into()), ErrorKind::Connectivity),
            (SpeechError::EngineFailed("exit 3".into()), ErrorKind::BackendRejected),
            (SpeechError::Timeout(120_000), ErrorKind::BackendRejected),
            (SpeechError::Configuration("threads".into()), ErrorKind::Configuration),
        ];
        for (err, kind) in cases {
            assert_eq!(SpeechAdapter::map_error(err).kind(), kind);
        }
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = SpeechConfig {
            stt: LocalSttConfig {
                threads: 0,
                ..Default::default()
            },
            scratch_dir: Some(PathBuf::from("/tmp")),
            ..Default::default()
        };

        let err = SpeechAdapter::new(config).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
