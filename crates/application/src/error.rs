//! Application-level errors
//!
//! Every stage failure is normalized into one of the kinds below before it
//! reaches the transport layer.

use std::fmt;

use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Unknown provider identity or missing credential
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend or engine could not be reached
    #[error("{0}")]
    Connectivity(String),

    /// Backend answered with a failure status, timed out, or the engine failed
    #[error("{0}")]
    BackendRejected(String),

    /// Backend answered without the expected field
    #[error("{0}")]
    MalformedResponse(String),

    /// Caller input was empty or invalid
    #[error("{0}")]
    Validation(String),

    /// Scratch file could not be created, written or read
    #[error("Storage error: {0}")]
    Storage(String),

    /// Anything outside the declared taxonomy
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Declared error kinds, plus `Internal` for everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Connectivity,
    BackendRejected,
    MalformedResponse,
    Validation,
    Storage,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Connectivity => "connectivity",
            Self::BackendRejected => "backend_rejected",
            Self::MalformedResponse => "malformed_response",
            Self::Validation => "validation",
            Self::Storage => "storage",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApplicationError {
    /// Kind of this error within the taxonomy
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) if e.is_input_error() => ErrorKind::Validation,
            Self::Domain(_) | Self::Configuration(_) => ErrorKind::Configuration,
            Self::Connectivity(_) => ErrorKind::Connectivity,
            Self::BackendRejected(_) => ErrorKind::BackendRejected,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Connectivity | ErrorKind::BackendRejected | ErrorKind::Storage
        )
    }
}
