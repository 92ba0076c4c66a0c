//! Port definitions for text generation
//!
//! Defines the trait (port) that every provider must implement.

use async_trait::async_trait;
use domain::{Prompt, ProviderIdentity};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Request for a single-turn generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// User prompt, sent as a single user-role message
    pub prompt: String,
}

impl InferenceRequest {
    /// Create a request from raw text
    pub fn simple(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Create a request from a validated prompt
    pub fn from_prompt(prompt: &Prompt) -> Self {
        Self::simple(prompt.as_str())
    }

    /// Reject blank prompts before any I/O
    pub(crate) fn ensure_prompt(&self) -> Result<(), InferenceError> {
        if self.prompt.trim().is_empty() {
            return Err(InferenceError::InvalidRequest(
                "Prompt cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response from a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Generated content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Port for text-generation providers
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate a completion for a single prompt
    async fn generate(&self, request: InferenceRequest)
    -> Result<InferenceResponse, InferenceError>;

    /// Check if the backend is reachable and healthy
    async fn health_check(&self) -> Result<bool, InferenceError>;

    /// Get the model this provider requests by default
    fn default_model(&self) -> &str;

    /// Which provider this is
    fn identity(&self) -> ProviderIdentity;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_request_keeps_text() {
        let req = InferenceRequest::simple("Hello");
        assert_eq!(req.prompt, "Hello");
    }

    #[test]
    fn from_prompt_copies_text() {
        let prompt = Prompt::new("Where is the milk?").unwrap();
        let req = InferenceRequest::from_prompt(&prompt);
        assert_eq!(req.prompt, "Where is the milk?");
    }

    #[test]
    fn ensure_prompt_rejects_blank() {
        let err = InferenceRequest::simple("  ").ensure_prompt().unwrap_err();
        assert!(matches!(err, InferenceError::InvalidRequest(_)));
        assert!(InferenceRequest::simple("ok").ensure_prompt().is_ok());
    }

    #[test]
    fn serializes_prompt_only() {
        let json = serde_json::to_value(InferenceRequest::simple("Test")).unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "Test"}));
    }
}
