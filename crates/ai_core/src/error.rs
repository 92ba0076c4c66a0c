//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Request rejected before any I/O (e.g. empty prompt)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider could not be constructed from its configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend could not be reached
    #[error("Could not connect to {backend} API. Please ensure it is running and accessible.")]
    Unreachable {
        /// Backend display name
        backend: String,
    },

    /// Backend answered with a non-success status
    #[error("{backend} API returned status {status}: {detail}")]
    Rejected {
        /// Backend display name
        backend: String,
        /// HTTP status code
        status: u16,
        /// Response body or reason
        detail: String,
    },

    /// Backend did not answer in time
    #[error("{backend} API timed out after {timeout_ms}ms")]
    Timeout {
        /// Backend display name
        backend: String,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Transport failure that is neither a connect error nor a timeout
    #[error("{backend} API request failed: {detail}")]
    RequestFailed {
        /// Backend display name
        backend: String,
        /// Underlying error
        detail: String,
    },

    /// Backend answered but the payload lacks the completion field
    #[error("Unexpected {backend} API response format: {detail}")]
    MalformedResponse {
        /// Backend display name
        backend: String,
        /// What was missing or unparseable
        detail: String,
    },
}

impl InferenceError {
    /// Classify a transport-level `reqwest` error for a given backend
    pub fn from_transport(backend: &str, timeout_ms: u64, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                backend: backend.to_string(),
                timeout_ms,
            }
        } else if err.is_connect() {
            Self::Unreachable {
                backend: backend.to_string(),
            }
        } else {
            Self::RequestFailed {
                backend: backend.to_string(),
                detail: err.to_string(),
            }
        }
    }

    /// Create a malformed-response error
    pub fn malformed(backend: &str, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            backend: backend.to_string(),
            detail: detail.into(),
        }
    }
}
