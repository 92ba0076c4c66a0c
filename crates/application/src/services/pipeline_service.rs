//! Pipeline service - Orchestrates speech-in, text-in and speech-out
//!
//! Each entry point validates its input before any stage runs, invokes the
//! stage(s), and folds every declared error kind into an [`ErrorReply`].
//! Errors outside the taxonomy are returned as `Err` so the transport layer
//! answers with a generic internal failure.

use std::{fmt, sync::Arc};

use domain::{AudioBlob, GeneratedText, Prompt, ProviderIdentity};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::{ApplicationError, ErrorKind},
    ports::{
        SynthesisPort, SynthesizedSpeech, TextGenerationPort, TranscriptionPort,
        TranscriptionResult,
    },
};

/// Raw upload as received by the transport layer
#[derive(Debug, Clone, Default)]
pub struct AudioUpload {
    /// Uploaded bytes
    pub bytes: Vec<u8>,
    /// Declared MIME type
    pub content_type: Option<String>,
    /// Original file name
    pub file_name: Option<String>,
}

impl AudioUpload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    fn into_blob(self) -> Result<AudioBlob, ApplicationError> {
        Ok(AudioBlob::from_upload(
            self.bytes,
            self.content_type.as_deref(),
            self.file_name.as_deref(),
        )?)
    }
}

/// User-facing failure, serialized as `{"error": message}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    #[serde(skip)]
    pub kind: ErrorKind,
    pub error: String,
}

/// Outcome of a pipeline entry point for a declared error kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineReply<T> {
    Ok(T),
    Error(ErrorReply),
}

impl<T> PipelineReply<T> {
    /// The success value, if any
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// The error reply, if any
    pub const fn error(&self) -> Option<&ErrorReply> {
        match self {
            Self::Ok(_) => None,
            Self::Error(reply) => Some(reply),
        }
    }
}

/// Result of the full voice round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceReply {
    /// What the caller said
    pub transcription: String,
    /// What the provider answered
    pub response: GeneratedText,
    /// The answer as audio; the holder owns the file
    pub speech: SynthesizedSpeech,
}

/// Service composing the STT, text-generation and TTS stages
pub struct PipelineService {
    generator: Arc<dyn TextGenerationPort>,
    transcriber: Arc<dyn TranscriptionPort>,
    synthesizer: Arc<dyn SynthesisPort>,
}

impl fmt::Debug for PipelineService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineService")
            .field("default_provider", &self.generator.default_provider())
            .finish_non_exhaustive()
    }
}

/// Fold declared kinds into a reply; pass internal failures through
fn settle<T>(
    stage: &'static str,
    result: Result<T, ApplicationError>,
) -> Result<PipelineReply<T>, ApplicationError> {
    match result {
        Ok(value) => Ok(PipelineReply::Ok(value)),
        Err(e) if e.kind() == ErrorKind::Internal => {
            error!(stage, error = %e, "Pipeline stage failed unexpectedly");
            Err(e)
        },
        Err(e) => {
            let kind = e.kind();
            if kind == ErrorKind::Validation {
                debug!(stage, error = %e, "Rejected invalid input");
            } else {
                warn!(stage, kind = %kind, error = %e, "Pipeline stage failed");
            }
            Ok(PipelineReply::Error(ErrorReply {
                kind,
                error: e.to_string(),
            }))
        },
    }
}

impl PipelineService {
    /// Create a new pipeline service
    pub fn new(
        generator: Arc<dyn TextGenerationPort>,
        transcriber: Arc<dyn TranscriptionPort>,
        synthesizer: Arc<dyn SynthesisPort>,
    ) -> Self {
        Self {
            generator,
            transcriber,
            synthesizer,
        }
    }

    /// Provider used when a request names none
    pub fn default_provider(&self) -> ProviderIdentity {
        self.generator.default_provider()
    }

    /// Parse an optional provider name; blank means the default
    fn resolve_provider(&self, name: Option<&str>) -> Result<ProviderIdentity, ApplicationError> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(self.generator.default_provider()),
            Some(n) => Ok(n.parse::<ProviderIdentity>()?),
        }
    }

    /// Speech-in: transcribe an uploaded recording
    #[instrument(
        skip(self, upload),
        fields(size = upload.bytes.len(), content_type = ?upload.content_type)
    )]
    pub async fn transcribe_speech(
        &self,
        upload: AudioUpload,
    ) -> Result<PipelineReply<TranscriptionResult>, ApplicationError> {
        let result = async {
            let blob = upload.into_blob()?;
            self.transcriber.transcribe(blob).await
        }
        .await;
        settle("transcribe", result)
    }

    /// Text-in: generate a completion with the named (or default) provider
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), provider = ?provider))]
    pub async fn generate_text(
        &self,
        prompt: &str,
        provider: Option<&str>,
    ) -> Result<PipelineReply<GeneratedText>, ApplicationError> {
        let result = async {
            let provider = self.resolve_provider(provider)?;
            let prompt = Prompt::new(prompt)?;
            self.generator.generate(&prompt, provider).await
        }
        .await;
        settle("generate", result)
    }

    /// Speech-out: synthesize text into an audio file
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn synthesize_speech(
        &self,
        text: &str,
    ) -> Result<PipelineReply<SynthesizedSpeech>, ApplicationError> {
        let result = async {
            if text.trim().is_empty() {
                return Err(ApplicationError::Validation(
                    "Text cannot be empty".to_string(),
                ));
            }
            self.synthesizer.synthesize(text).await
        }
        .await;
        settle("synthesize", result)
    }

    /// Full round trip: transcribe, generate, synthesize
    #[instrument(skip(self, upload), fields(size = upload.bytes.len(), provider = ?provider))]
    pub async fn respond_to_speech(
        &self,
        upload: AudioUpload,
        provider: Option<&str>,
    ) -> Result<PipelineReply<VoiceReply>, ApplicationError> {
        let result = async {
            let provider = self.resolve_provider(provider)?;
            let blob = upload.into_blob()?;

            let transcription = self.transcriber.transcribe(blob).await?;
            let prompt = Prompt::new(transcription.text.as_str()).map_err(|_| {
                ApplicationError::Validation("No speech detected in audio".to_string())
            })?;
            debug!(chars = prompt.char_count(), "Transcription complete");

            let response = self.generator.generate(&prompt, provider).await?;
            debug!(chars = response.as_str().len(), "Response generated");

            let speech = self.synthesizer.synthesize(response.as_str()).await?;
            info!(provider = %provider, "Voice round trip complete");

            Ok(VoiceReply {
                transcription: transcription.text,
                response,
                speech,
            })
        }
        .await;
        settle("respond_to_speech", result)
    }
}
