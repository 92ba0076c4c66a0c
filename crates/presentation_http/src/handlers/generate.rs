//! Text generation handler

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::into_result;
use crate::{error::ApiError, state::AppState};

/// Generation request
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Prompt text
    pub prompt: String,
    /// Provider name (`local-inference` or `cloud-api`); default when absent
    #[serde(default)]
    pub provider: Option<String>,
}

/// Generation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub response: String,
    /// Provider that produced it
    pub provider: String,
}

/// Generate a completion for a text prompt
#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let reply = state
        .pipeline
        .generate_text(&request.prompt, request.provider.as_deref())
        .await?;
    let generated = into_result(reply)?;

    Ok(Json(GenerateResponse {
        provider: generated.provider().to_string(),
        response: generated.into_text(),
    }))
}
