//! Provider registry
//!
//! Resolves a `ProviderIdentity` (or its wire name) to a ready engine.
//! Engines are built lazily on first use and cached for the lifetime of the
//! registry. A provider that fails to build is never cached, so a later call
//! retries construction.

use std::collections::HashMap;
use std::sync::Arc;

use domain::ProviderIdentity;
use parking_lot::RwLock;
use tracing::{debug, instrument, warn};

use crate::cloud::CloudInferenceEngine;
use crate::config::ProviderSettings;
use crate::error::InferenceError;
use crate::local::LocalInferenceEngine;
use crate::ports::InferenceEngine;

/// Registry of text-generation providers
pub struct ProviderRegistry {
    settings: ProviderSettings,
    engines: RwLock<HashMap<ProviderIdentity, Arc<dyn InferenceEngine>>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached: Vec<ProviderIdentity> = self.engines.read().keys().copied().collect();
        f.debug_struct("ProviderRegistry")
            .field("default_provider", &self.settings.default_provider)
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

impl ProviderRegistry {
    /// Create a registry; no engine is built yet
    #[must_use]
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            engines: RwLock::new(HashMap::new()),
        }
    }

    /// Provider used when a request does not name one
    #[must_use]
    pub const fn default_provider(&self) -> ProviderIdentity {
        self.settings.default_provider
    }

    /// Resolve a provider by wire name (`local-inference` / `cloud-api`)
    ///
    /// Unknown names fail with `InferenceError::Configuration` before any
    /// engine is constructed.
    pub fn resolve_name(&self, name: &str) -> Result<Arc<dyn InferenceEngine>, InferenceError> {
        let identity: ProviderIdentity = name
            .parse()
            .map_err(|e: domain::DomainError| InferenceError::Configuration(e.to_string()))?;
        self.resolve(identity)
    }

    /// Resolve the configured default provider
    pub fn resolve_default(&self) -> Result<Arc<dyn InferenceEngine>, InferenceError> {
        self.resolve(self.settings.default_provider)
    }

    /// Resolve a provider, building and caching it on first use
    #[instrument(skip(self), fields(provider = %identity))]
    pub fn resolve(
        &self,
        identity: ProviderIdentity,
    ) -> Result<Arc<dyn InferenceEngine>, InferenceError> {
        if let Some(engine) = self.engines.read().get(&identity) {
            return Ok(Arc::clone(engine));
        }

        let built = self.build(identity).inspect_err(|e| {
            warn!(error = %e, "Failed to construct provider");
        })?;

        // Another caller may have won the race; keep whichever landed first
        let mut engines = self.engines.write();
        let engine = engines.entry(identity).or_insert(built);
        debug!("Provider ready");
        Ok(Arc::clone(engine))
    }

    fn build(
        &self,
        identity: ProviderIdentity,
    ) -> Result<Arc<dyn InferenceEngine>, InferenceError> {
        Ok(match identity {
            ProviderIdentity::LocalInference => {
                Arc::new(LocalInferenceEngine::new(self.settings.local.clone())?)
            },
            ProviderIdentity::CloudApi => {
                Arc::new(CloudInferenceEngine::new(self.settings.cloud.clone())?)
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn settings_with_key() -> ProviderSettings {
        let mut settings = ProviderSettings::default();
        settings.cloud.api_key = Some(SecretString::from("key".to_string()));
        settings
    }

    #[test]
    fn resolves_local_by_name() {
        let registry = ProviderRegistry::new(ProviderSettings::default());
        let engine = registry.resolve_name("local-inference").unwrap();
        assert_eq!(engine.identity(), ProviderIdentity::LocalInference);
    }

    #[test]
    fn resolves_cloud_when_credential_present() {
        let registry = ProviderRegistry::new(settings_with_key());
        let engine = registry.resolve_name("cloud-api").unwrap();
        assert_eq!(engine.identity(), ProviderIdentity::CloudApi);
        assert_eq!(engine.default_model(), "gemini-pro");
    }

    #[test]
    fn unknown_name_is_configuration_error() {
        let registry = ProviderRegistry::new(ProviderSettings::default());
        let err = registry.resolve_name("openai").err().unwrap();
        assert!(matches!(err, InferenceError::Configuration(_)));
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn cloud_without_credential_fails_and_is_not_cached() {
        let registry = ProviderRegistry::new(ProviderSettings::default());
        assert!(registry.resolve(ProviderIdentity::CloudApi).is_err());
        assert!(registry.engines.read().is_empty());
    }

    #[test]
    fn repeated_resolution_returns_cached_engine() {
        let registry = ProviderRegistry::new(ProviderSettings::default());
        let first = registry.resolve(ProviderIdentity::LocalInference).unwrap();
        let second = registry.resolve_name("LOCAL-INFERENCE").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn default_resolution_follows_settings() {
        let mut settings = settings_with_key();
        settings.default_provider = ProviderIdentity::CloudApi;
        let registry = ProviderRegistry::new(settings);
        assert_eq!(registry.default_provider(), ProviderIdentity::CloudApi);
        let engine = registry.resolve_default().unwrap();
        assert_eq!(engine.identity(), ProviderIdentity::CloudApi);
    }
}
