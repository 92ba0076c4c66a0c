//! Speech handlers: speech-to-text, text-to-speech and the voice round trip

use application::{ApplicationError, SynthesizedSpeech};
use axum::{
    Json,
    extract::{Multipart, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderName, HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::{into_result, upload::read_audio_form};
use crate::{error::ApiError, state::AppState};

/// Header carrying the percent-encoded transcription
pub const X_TRANSCRIPTION: HeaderName = HeaderName::from_static("x-transcription");
/// Header carrying the percent-encoded reply text
pub const X_RESPONSE_TEXT: HeaderName = HeaderName::from_static("x-response-text");

/// Transcription response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// Synthesis request
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
}

/// Transcribe an uploaded recording
#[instrument(skip(state, multipart))]
pub async fn speech_to_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let form = read_audio_form(multipart).await?;

    let transcription = into_result(state.pipeline.transcribe_speech(form.upload).await?)?;

    Ok(Json(TranscriptionResponse {
        text: transcription.text,
    }))
}

/// Synthesize text and return the audio
#[instrument(skip(state, payload))]
pub async fn text_to_speech(
    State(state): State<AppState>,
    payload: Result<Json<SynthesisRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let speech = into_result(state.pipeline.synthesize_speech(&request.text).await?)?;

    audio_response(speech, HeaderMap::new()).await
}

/// Transcribe, answer and speak the answer in one request
#[instrument(skip(state, multipart))]
pub async fn voice_assistant(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_audio_form(multipart).await?;

    let reply = into_result(
        state
            .pipeline
            .respond_to_speech(form.upload, form.provider.as_deref())
            .await?,
    )?;

    let mut headers = HeaderMap::new();
    headers.insert(X_TRANSCRIPTION, encode_header(&reply.transcription)?);
    headers.insert(X_RESPONSE_TEXT, encode_header(reply.response.as_str())?);

    audio_response(reply.speech, headers).await
}

fn encode_header(text: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::try_from(urlencoding::encode(text).into_owned())
        .map_err(|e| ApiError::Internal(format!("Unencodable header value: {e}")))
}

/// Read the artifact into the response and remove it from disk
async fn audio_response(
    speech: SynthesizedSpeech,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let read = tokio::fs::read(&speech.path).await;

    if let Err(e) = tokio::fs::remove_file(&speech.path).await {
        warn!(path = %speech.path.display(), error = %e, "Failed to remove synthesized audio");
    }

    let bytes = read.map_err(|e| {
        ApplicationError::Storage(format!("Failed to read synthesized audio: {e}"))
    })?;

    Ok((
        [(header::CONTENT_TYPE, speech.format.mime_type())],
        headers,
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_values_are_percent_encoded() {
        let value = encode_header("Wo ist die Milch? Gang fünf.").unwrap();
        assert_eq!(value.to_str().unwrap(), "Wo%20ist%20die%20Milch%3F%20Gang%20f%C3%BCnf.");
    }
}
