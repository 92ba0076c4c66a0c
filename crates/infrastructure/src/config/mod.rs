//! Application configuration
//!
//! Split into focused sub-modules by domain:
//! - `server`: HTTP server settings
//!
//! Provider settings live in `ai_core`, speech engine settings in
//! `ai_speech`, and health check timeouts in `application`.

mod server;

use ai_core::ProviderSettings;
use ai_speech::SpeechConfig;
use application::HealthConfig;
use serde::{Deserialize, Serialize};

pub use server::{LogFormat, ServerConfig};

/// Prefix of environment overrides (e.g. `VOICE_ASSISTANT_SERVER_PORT`)
pub const ENV_PREFIX: &str = "VOICE_ASSISTANT";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Text-generation providers
    #[serde(default)]
    pub providers: ProviderSettings,

    /// Speech engines
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Health check timeouts
    #[serde(default)]
    pub health: HealthConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// Sources, lowest precedence first: built-in defaults, `config.toml`
    /// in the working directory, `VOICE_ASSISTANT_*` variables, then the
    /// `LOCAL_ENDPOINT`, `API_CREDENTIAL` and `MODEL_NAME` process
    /// variables for the providers.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Defaults come from the serde defaults of each section
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("_")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config.with_env_overrides())
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Apply the provider process variables
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply provider overrides from an arbitrary lookup
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.providers = self.providers.with_overrides(lookup);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ai_speech::AudioFormat;
    use domain::ProviderIdentity;

    use super::*;

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.log_format, LogFormat::Text);
        assert!(config.server.allowed_origins.is_empty());
        assert_eq!(config.providers.default_provider, ProviderIdentity::LocalInference);
    }

    #[test]
    fn empty_file_matches_defaults() {
        let loaded = AppConfig::from_toml_str("").unwrap();
        let default = AppConfig::default();

        for config in [&loaded, &default] {
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.server.port, 8000);
            assert_eq!(config.speech.ffmpeg_path, "ffmpeg");
            assert_eq!(config.speech.ffmpeg_timeout_ms, 60_000);
            assert_eq!(config.speech.tts.output_format, AudioFormat::Wav);
        }
    }

    #[test]
    fn app_config_from_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 8080
            log_format = "json"
            allowed_origins = ["http://localhost:5173"]

            [providers]
            default_provider = "cloud-api"

            [providers.local]
            endpoint = "http://10.0.0.5:1234/v1/chat/completions"

            [speech]
            ffmpeg_path = "/usr/local/bin/ffmpeg"
            scratch_dir = "/var/tmp/voice"

            [speech.tts]
            output_format = "mp3"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.providers.default_provider, ProviderIdentity::CloudApi);
        assert_eq!(
            config.providers.local.endpoint,
            "http://10.0.0.5:1234/v1/chat/completions"
        );
        assert_eq!(config.speech.ffmpeg_path, "/usr/local/bin/ffmpeg");
        assert_eq!(config.speech.scratch_dir, Some(PathBuf::from("/var/tmp/voice")));
        assert_eq!(config.speech.tts.output_format, AudioFormat::Mp3);
    }

    #[test]
    fn unknown_provider_in_file_is_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [providers]
            default_provider = "watson"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn process_variables_override_file() {
        let config = AppConfig::from_toml_str(
            r#"
            [providers.cloud]
            model = "gemini-1.5-flash"
            "#,
        )
        .unwrap()
        .with_overrides(|name| match name {
            "API_CREDENTIAL" => Some("secret".to_string()),
            "MODEL_NAME" => Some("gemini-2.0-flash".to_string()),
            _ => None,
        });

        assert_eq!(config.providers.cloud.api_key_str(), Some("secret"));
        assert_eq!(config.providers.cloud.model, "gemini-2.0-flash");
        assert_eq!(config.providers.local.model.as_deref(), Some("gemini-2.0-flash"));
    }

    #[test]
    fn credential_is_not_serialized() {
        let config = AppConfig::default()
            .with_overrides(|name| (name == "API_CREDENTIAL").then(|| "secret".to_string()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn bind_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }
}
