//! Health aggregation service
//!
//! Probes the text-generation providers and both speech engines, each under
//! its own timeout, and reports per-service status.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use domain::ProviderIdentity;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::ports::{SynthesisPort, TextGenerationPort, TranscriptionPort};

/// Default global timeout for health checks in seconds
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

const SPEECH_TO_TEXT: &str = "speech_to_text";
const TEXT_TO_SPEECH: &str = "text_to_speech";

/// Configuration for health check behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Global timeout for all health checks in seconds (default: 5)
    #[serde(default = "default_global_timeout")]
    pub global_timeout_secs: u64,

    /// Service-specific timeout overrides in seconds
    #[serde(default)]
    pub service_timeouts: HashMap<String, u64>,
}

const fn default_global_timeout() -> u64 {
    DEFAULT_HEALTH_CHECK_TIMEOUT_SECS
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            global_timeout_secs: default_global_timeout(),
            service_timeouts: HashMap::new(),
        }
    }
}

impl HealthConfig {
    /// Get the timeout for a specific service
    #[must_use]
    pub fn timeout_for_service(&self, service: &str) -> Duration {
        let secs = self
            .service_timeouts
            .get(service)
            .copied()
            .unwrap_or(self.global_timeout_secs);
        Duration::from_secs(secs)
    }
}

/// Status of an individual service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Whether the service is healthy
    pub healthy: bool,
    /// Optional additional information (e.g., backend name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Response time in milliseconds (if check completed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// Create a healthy status with additional info
    #[must_use]
    pub fn healthy_with_info(info: impl Into<String>) -> Self {
        Self {
            healthy: true,
            info: Some(info.into()),
            response_time_ms: None,
            error: None,
        }
    }

    /// Create an unhealthy status
    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            info: None,
            response_time_ms: None,
            error: Some(error.into()),
        }
    }

    /// Create an unhealthy status due to timeout
    #[must_use]
    pub fn timeout() -> Self {
        Self::unhealthy("Health check timed out")
    }

    /// Add response time to the status
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Health report across the pipeline's backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// True when the default provider and both speech engines are healthy
    pub healthy: bool,
    /// Provider used when a request names none
    pub default_provider: ProviderIdentity,
    /// Individual service statuses, keyed by name
    pub services: BTreeMap<String, ServiceHealth>,
}

impl HealthReport {
    /// Get status of a specific service
    #[must_use]
    pub fn service_status(&self, name: &str) -> Option<&ServiceHealth> {
        self.services.get(name)
    }
}

/// Service for aggregating health checks across the pipeline
pub struct HealthService {
    config: HealthConfig,
    generator: Arc<dyn TextGenerationPort>,
    transcriber: Arc<dyn TranscriptionPort>,
    synthesizer: Arc<dyn SynthesisPort>,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("config", &self.config)
            .field("generator", &"<TextGenerationPort>")
            .field("transcriber", &"<TranscriptionPort>")
            .field("synthesizer", &"<SynthesisPort>")
            .finish()
    }
}

impl HealthService {
    /// Create a new health service
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerationPort>,
        transcriber: Arc<dyn TranscriptionPort>,
        synthesizer: Arc<dyn SynthesisPort>,
    ) -> Self {
        Self {
            config: HealthConfig::default(),
            generator,
            transcriber,
            synthesizer,
        }
    }

    /// Set the health check configuration
    #[must_use]
    pub fn with_config(mut self, config: HealthConfig) -> Self {
        self.config = config;
        self
    }

    /// Check every provider and both speech engines
    #[instrument(skip(self))]
    pub async fn check_all(&self) -> HealthReport {
        let default_provider = self.generator.default_provider();
        let mut services = BTreeMap::new();

        for provider in ProviderIdentity::ALL {
            services.insert(provider.as_str().to_string(), self.check_provider(provider).await);
        }
        services.insert(SPEECH_TO_TEXT.to_string(), self.check_speech_to_text().await);
        services.insert(TEXT_TO_SPEECH.to_string(), self.check_text_to_speech().await);

        let healthy = [default_provider.as_str(), SPEECH_TO_TEXT, TEXT_TO_SPEECH]
            .iter()
            .all(|name| services.get(*name).is_some_and(|s| s.healthy));

        HealthReport {
            healthy,
            default_provider,
            services,
        }
    }

    /// Check a single text-generation provider
    #[instrument(skip(self), fields(provider = %provider))]
    pub async fn check_provider(&self, provider: ProviderIdentity) -> ServiceHealth {
        self.probe(
            provider.as_str(),
            provider.backend_name(),
            self.generator.is_healthy(provider),
        )
        .await
    }

    /// Check the speech recognition engine
    pub async fn check_speech_to_text(&self) -> ServiceHealth {
        self.probe(SPEECH_TO_TEXT, "whisper.cpp", self.transcriber.is_available())
            .await
    }

    /// Check the speech synthesis engine
    pub async fn check_text_to_speech(&self) -> ServiceHealth {
        self.probe(TEXT_TO_SPEECH, "Piper", self.synthesizer.is_available())
            .await
    }

    async fn probe(
        &self,
        service: &str,
        backend: &str,
        check: impl Future<Output = bool> + Send,
    ) -> ServiceHealth {
        let start = Instant::now();

        let Ok(healthy) = timeout(self.config.timeout_for_service(service), check).await else {
            warn!(service, "Health check timed out");
            return ServiceHealth::timeout();
        };

        let response_time = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        if healthy {
            debug!(service, response_time_ms = response_time, "Service healthy");
            ServiceHealth::healthy_with_info(backend).with_response_time(response_time)
        } else {
            warn!(service, response_time_ms = response_time, "Service unhealthy");
            ServiceHealth::unhealthy(format!("{backend} is not available"))
                .with_response_time(response_time)
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use domain::{GeneratedText, Prompt};

    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::{MockSynthesisPort, MockTranscriptionPort};

    struct StubGenerator {
        local: bool,
        cloud: bool,
        delay: Duration,
    }

    #[async_trait]
    impl TextGenerationPort for StubGenerator {
        async fn generate(
            &self,
            _prompt: &Prompt,
            _provider: ProviderIdentity,
        ) -> Result<GeneratedText, ApplicationError> {
            unreachable!("generate should not be called in health service tests")
        }

        async fn is_healthy(&self, provider: ProviderIdentity) -> bool {
            tokio::time::sleep(self.delay).await;
            match provider {
                ProviderIdentity::LocalInference => self.local,
                ProviderIdentity::CloudApi => self.cloud,
            }
        }

        fn default_provider(&self) -> ProviderIdentity {
            ProviderIdentity::LocalInference
        }
    }

    fn speech(stt: bool, tts: bool) -> (MockTranscriptionPort, MockSynthesisPort) {
        let mut transcriber = MockTranscriptionPort::new();
        transcriber.expect_is_available().return_const(stt);
        let mut synthesizer = MockSynthesisPort::new();
        synthesizer.expect_is_available().return_const(tts);
        (transcriber, synthesizer)
    }

    fn service(generator: StubGenerator, stt: bool, tts: bool) -> HealthService {
        let (transcriber, synthesizer) = speech(stt, tts);
        HealthService::new(Arc::new(generator), Arc::new(transcriber), Arc::new(synthesizer))
    }

    #[tokio::test]
    async fn all_healthy() {
        let svc = service(
            StubGenerator {
                local: true,
                cloud: true,
                delay: Duration::ZERO,
            },
            true,
            true,
        );

        let report = svc.check_all().await;

        assert!(report.healthy);
        assert_eq!(report.services.len(), 4);
        assert_eq!(
            report.service_status("local-inference").unwrap().info.as_deref(),
            Some("LM Studio")
        );
    }

    #[tokio::test]
    async fn non_default_provider_does_not_fail_readiness() {
        let svc = service(
            StubGenerator {
                local: true,
                cloud: false,
                delay: Duration::ZERO,
            },
            true,
            true,
        );

        let report = svc.check_all().await;

        assert!(report.healthy);
        let cloud = report.service_status("cloud-api").unwrap();
        assert!(!cloud.healthy);
        assert_eq!(cloud.error.as_deref(), Some("Gemini is not available"));
    }

    #[tokio::test]
    async fn missing_speech_engine_fails_readiness() {
        let svc = service(
            StubGenerator {
                local: true,
                cloud: true,
                delay: Duration::ZERO,
            },
            true,
            false,
        );

        let report = svc.check_all().await;

        assert!(!report.healthy);
        assert!(!report.service_status(TEXT_TO_SPEECH).unwrap().healthy);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let config = HealthConfig {
            global_timeout_secs: 5,
            service_timeouts: HashMap::from([("local-inference".to_string(), 1)]),
        };
        let svc = service(
            StubGenerator {
                local: true,
                cloud: true,
                delay: Duration::from_secs(3),
            },
            true,
            true,
        )
        .with_config(config);

        let status = svc.check_provider(ProviderIdentity::LocalInference).await;

        assert_eq!(status, ServiceHealth::timeout());
    }

    #[test]
    fn timeout_override_per_service() {
        let config = HealthConfig {
            global_timeout_secs: 5,
            service_timeouts: HashMap::from([("cloud-api".to_string(), 10)]),
        };
        assert_eq!(config.timeout_for_service("cloud-api"), Duration::from_secs(10));
        assert_eq!(config.timeout_for_service("speech_to_text"), Duration::from_secs(5));
    }
}
