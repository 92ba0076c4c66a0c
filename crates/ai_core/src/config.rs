//! Configuration for text-generation providers

use domain::ProviderIdentity;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the local inference URL
pub const LOCAL_ENDPOINT_VAR: &str = "LOCAL_ENDPOINT";
/// Environment variable holding the cloud API credential
pub const API_CREDENTIAL_VAR: &str = "API_CREDENTIAL";
/// Environment variable selecting the model variant
pub const MODEL_NAME_VAR: &str = "MODEL_NAME";

/// Configuration for the local OpenAI-compatible inference server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalInferenceConfig {
    /// Full chat completions URL
    #[serde(default = "default_local_endpoint")]
    pub endpoint: String,

    /// Model to request; the server's loaded model is used when unset
    #[serde(default)]
    pub model: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_local_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Configuration for the Gemini cloud API
#[derive(Clone, Serialize, Deserialize)]
pub struct CloudInferenceConfig {
    /// API base URL
    #[serde(default = "default_cloud_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_cloud_model")]
    pub model: String,

    /// API credential (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds
    #[serde(default = "default_cloud_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl std::fmt::Debug for CloudInferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudInferenceConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_ms", &self.timeout_ms)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Settings for every provider the registry can construct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider used when a request does not name one
    #[serde(default)]
    pub default_provider: ProviderIdentity,

    /// Local inference server settings
    #[serde(default)]
    pub local: LocalInferenceConfig,

    /// Cloud API settings
    #[serde(default)]
    pub cloud: CloudInferenceConfig,
}

fn default_local_endpoint() -> String {
    "http://localhost:1234/v1/chat/completions".to_string()
}

fn default_cloud_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_cloud_model() -> String {
    "gemini-pro".to_string()
}

const fn default_local_timeout_ms() -> u64 {
    10_000
}

const fn default_cloud_timeout_ms() -> u64 {
    30_000
}

const fn default_max_tokens() -> u32 {
    1000
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for LocalInferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_local_endpoint(),
            model: None,
            timeout_ms: default_local_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for CloudInferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_cloud_base_url(),
            model: default_cloud_model(),
            api_key: None,
            timeout_ms: default_cloud_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl CloudInferenceConfig {
    /// Credential as a string reference, ignoring blank values
    #[must_use]
    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|key| !key.trim().is_empty())
    }
}

impl ProviderSettings {
    /// Apply `LOCAL_ENDPOINT`, `API_CREDENTIAL` and `MODEL_NAME` from the
    /// process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup; blank values are ignored
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = lookup(LOCAL_ENDPOINT_VAR) {
            self.local.endpoint = endpoint;
        }
        if let Some(credential) = lookup(API_CREDENTIAL_VAR) {
            self.cloud.api_key = Some(SecretString::from(credential));
        }
        if let Some(model) = lookup(MODEL_NAME_VAR) {
            self.local.model = Some(model.clone());
            self.cloud.model = model;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn local_defaults() {
        let config = LocalInferenceConfig::default();
        assert_eq!(config.endpoint, "http://localhost:1234/v1/chat/completions");
        assert!(config.model.is_none());
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.max_tokens, 1000);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn cloud_defaults() {
        let config = CloudInferenceConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com/v1beta");
        assert_eq!(config.model, "gemini-pro");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.max_tokens, 1000);
    }

    #[test]
    fn default_provider_is_local() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.default_provider, ProviderIdentity::LocalInference);
    }

    #[test]
    fn overrides_apply_all_three_variables() {
        let settings = ProviderSettings::default().with_overrides(lookup_from(&[
            ("LOCAL_ENDPOINT", "http://gpu-box:1234/v1/chat/completions"),
            ("API_CREDENTIAL", "secret-key"),
            ("MODEL_NAME", "qwen2.5-7b-instruct"),
        ]));

        assert_eq!(settings.local.endpoint, "http://gpu-box:1234/v1/chat/completions");
        assert_eq!(settings.cloud.api_key_str(), Some("secret-key"));
        assert_eq!(settings.local.model.as_deref(), Some("qwen2.5-7b-instruct"));
        assert_eq!(settings.cloud.model, "qwen2.5-7b-instruct");
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let settings = ProviderSettings::default()
            .with_overrides(lookup_from(&[("API_CREDENTIAL", "  "), ("LOCAL_ENDPOINT", "")]));

        assert!(settings.cloud.api_key.is_none());
        assert_eq!(settings.local.endpoint, default_local_endpoint());
    }

    #[test]
    fn api_key_str_filters_blank_secret() {
        let config = CloudInferenceConfig {
            api_key: Some(SecretString::from(" ".to_string())),
            ..Default::default()
        };
        assert!(config.api_key_str().is_none());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = CloudInferenceConfig {
            api_key: Some(SecretString::from("super-secret".to_string())),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn settings_deserialize_from_toml() {
        let toml = r#"
            default_provider = "cloud-api"

            [local]
            endpoint = "http://127.0.0.1:8080/v1/chat/completions"
            max_tokens = 100

            [cloud]
            model = "gemini-1.5-flash"
            api_key = "from-file"
        "#;

        let settings: ProviderSettings = toml::from_str(toml).unwrap();

        assert_eq!(settings.default_provider, ProviderIdentity::CloudApi);
        assert_eq!(settings.local.endpoint, "http://127.0.0.1:8080/v1/chat/completions");
        assert_eq!(settings.local.max_tokens, 100);
        assert_eq!(settings.local.timeout_ms, 10_000);
        assert_eq!(settings.cloud.model, "gemini-1.5-flash");
        assert_eq!(settings.cloud.api_key_str(), Some("from-file"));
    }

    #[test]
    fn serialization_skips_api_key() {
        let config = CloudInferenceConfig {
            api_key: Some(SecretString::from("hidden".to_string())),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hidden"));
        assert!(json.contains("base_url"));
    }
}
