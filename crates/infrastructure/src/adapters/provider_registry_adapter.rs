//! Provider registry adapter - Implements TextGenerationPort using ai_core

use std::sync::Arc;

use ai_core::{InferenceError, InferenceRequest, ProviderRegistry, ProviderSettings};
use application::error::ApplicationError;
use application::ports::TextGenerationPort;
use async_trait::async_trait;
use domain::{GeneratedText, Prompt, ProviderIdentity};
use tracing::{debug, instrument, warn};

/// Adapter routing generation requests through the provider registry
pub struct ProviderRegistryAdapter {
    registry: Arc<ProviderRegistry>,
}

impl std::fmt::Debug for ProviderRegistryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistryAdapter")
            .field("registry", &self.registry)
            .finish()
    }
}

impl ProviderRegistryAdapter {
    /// Wrap an existing registry
    #[must_use]
    pub const fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Create an adapter with a fresh registry built from settings
    #[must_use]
    pub fn from_settings(settings: ProviderSettings) -> Self {
        Self::new(Arc::new(ProviderRegistry::new(settings)))
    }

    /// Map inference error to application error
    fn map_error(err: InferenceError) -> ApplicationError {
        match err {
            InferenceError::InvalidRequest(e) => ApplicationError::Validation(e),
            InferenceError::Configuration(e) => ApplicationError::Configuration(e),
            e @ InferenceError::Unreachable { .. } => {
                ApplicationError::Connectivity(e.to_string())
            },
            e @ (InferenceError::Rejected { .. }
            | InferenceError::Timeout { .. }
            | InferenceError::RequestFailed { .. }) => {
                ApplicationError::BackendRejected(e.to_string())
            },
            e @ InferenceError::MalformedResponse { .. } => {
                ApplicationError::MalformedResponse(e.to_string())
            },
        }
    }
}

#[async_trait]
impl TextGenerationPort for ProviderRegistryAdapter {
    #[instrument(
        skip(self, prompt),
        fields(provider = %provider, prompt_len = prompt.char_count())
    )]
    async fn generate(
        &self,
        prompt: &Prompt,
        provider: ProviderIdentity,
    ) -> Result<GeneratedText, ApplicationError> {
        let engine = self.registry.resolve(provider).map_err(Self::map_error)?;

        let response = engine
            .generate(InferenceRequest::from_prompt(prompt))
            .await
            .map_err(Self::map_error)?;

        debug!(
            model = %response.model,
            finish_reason = ?response.finish_reason,
            "Generation complete"
        );

        Ok(GeneratedText::new(response.content, provider))
    }

    async fn is_healthy(&self, provider: ProviderIdentity) -> bool {
        let engine = match self.registry.resolve(provider) {
            Ok(engine) => engine,
            Err(e) => {
                debug!(provider = %provider, error = %e, "Provider not constructible");
                return false;
            },
        };

        engine.health_check().await.unwrap_or_else(|e| {
            warn!(provider = %provider, error = %e, "Provider health check failed");
            false
        })
    }

    fn default_provider(&self) -> ProviderIdentity {
        self.registry.default_provider()
    }
}
