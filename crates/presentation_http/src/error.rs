//! API error handling
//!
//! Every failure is rendered as `{"error": message}`. Declared pipeline
//! kinds carry their message through; internal failures are reduced to a
//! generic message and logged.

use application::{ApplicationError, ErrorKind, ErrorReply};
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// A declared pipeline failure
    #[error("{}", .0.error)]
    Pipeline(ErrorReply),

    /// Malformed request that never reached the pipeline
    #[error("{0}")]
    BadRequest(String),

    /// Anything outside the taxonomy
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// HTTP status for a pipeline error kind
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::Configuration => StatusCode::BAD_REQUEST,
        ErrorKind::Connectivity => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::BackendRejected | ErrorKind::MalformedResponse => StatusCode::BAD_GATEWAY,
        ErrorKind::Storage | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Pipeline(reply) => (status_for(reply.kind), reply.error),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            },
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ErrorReply> for ApiError {
    fn from(reply: ErrorReply) -> Self {
        Self::Pipeline(reply)
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err.kind() {
            ErrorKind::Internal => Self::Internal(err.to_string()),
            kind => Self::Pipeline(ErrorReply {
                kind,
                error: err.to_string(),
            }),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}
