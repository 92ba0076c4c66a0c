//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use infrastructure::ServerConfig;

use crate::{handlers, state::AppState};

/// Per-route request body limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimits {
    /// Multipart audio uploads
    pub audio_bytes: usize,
    /// JSON request bodies
    pub json_bytes: usize,
}

impl Default for BodyLimits {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for BodyLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            audio_bytes: config.max_body_size_audio_bytes,
            json_bytes: config.max_body_size_json_bytes,
        }
    }
}

impl BodyLimits {
    /// Largest limit of any route
    pub fn max(&self) -> usize {
        self.audio_bytes.max(self.json_bytes)
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState, limits: BodyLimits) -> Router {
    let audio_limit = DefaultBodyLimit::max(limits.audio_bytes);
    let json_limit = DefaultBodyLimit::max(limits.json_bytes);

    Router::new()
        // Health and status endpoints
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Pipeline stages
        .route(
            "/speech-to-text",
            post(handlers::speech::speech_to_text).layer(audio_limit),
        )
        .route(
            "/generate",
            post(handlers::generate::generate).layer(json_limit),
        )
        .route(
            "/text-to-speech",
            post(handlers::speech::text_to_speech).layer(json_limit),
        )
        // Full round trip
        .route(
            "/voice-assistant",
            post(handlers::speech::voice_assistant).layer(audio_limit),
        )
        // Attach state
        .with_state(state)
}
