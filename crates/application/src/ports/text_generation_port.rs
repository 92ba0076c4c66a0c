//! Text generation port - Interface for provider-backed completions

use async_trait::async_trait;
use domain::{GeneratedText, Prompt, ProviderIdentity};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for text generation across interchangeable providers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    /// Generate a completion for `prompt` with the given provider
    async fn generate(
        &self,
        prompt: &Prompt,
        provider: ProviderIdentity,
    ) -> Result<GeneratedText, ApplicationError>;

    /// Check if the provider's backend is reachable
    async fn is_healthy(&self, provider: ProviderIdentity) -> bool;

    /// Provider used when a request names none
    fn default_provider(&self) -> ProviderIdentity;
}
