//! Multipart audio form parsing

use application::AudioUpload;
use axum::extract::Multipart;
use tracing::debug;

use crate::error::ApiError;

/// Audio form field name
const AUDIO_FIELD: &str = "audio";
/// Optional provider form field name
const PROVIDER_FIELD: &str = "provider";

/// Parsed multipart audio form
#[derive(Debug)]
pub(crate) struct AudioForm {
    pub upload: AudioUpload,
    pub provider: Option<String>,
}

/// Read the `audio` file and the optional `provider` field
pub(crate) async fn read_audio_form(mut multipart: Multipart) -> Result<AudioForm, ApiError> {
    let mut upload = None;
    let mut provider = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(AUDIO_FIELD) => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                debug!(size = bytes.len(), ?content_type, ?file_name, "Received audio upload");
                upload = Some(AudioUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                    file_name,
                });
            },
            Some(PROVIDER_FIELD) => provider = Some(field.text().await?),
            _ => {},
        }
    }

    let upload = upload
        .ok_or_else(|| ApiError::BadRequest(format!("Missing '{AUDIO_FIELD}' field")))?;

    Ok(AudioForm { upload, provider })
}
