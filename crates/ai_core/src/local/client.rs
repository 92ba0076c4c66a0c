//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use domain::ProviderIdentity;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::LocalInferenceConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};

/// Model name reported when the server decides which model answers
const SERVER_LOADED_MODEL: &str = "local-model";

/// Local inference engine backed by an LM Studio style server
pub struct LocalInferenceEngine {
    client: Client,
    config: LocalInferenceConfig,
    endpoint: Url,
}

impl std::fmt::Debug for LocalInferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalInferenceEngine")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl LocalInferenceEngine {
    /// Create a new local inference engine
    ///
    /// Fails with `InferenceError::Configuration` when the endpoint is not
    /// a valid URL. No network traffic happens here.
    pub fn new(config: LocalInferenceConfig) -> Result<Self, InferenceError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            InferenceError::Configuration(format!(
                "Invalid local endpoint '{}': {e}",
                config.endpoint
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            endpoint = %endpoint,
            model = config.model.as_deref().unwrap_or(SERVER_LOADED_MODEL),
            "Initialized local inference engine"
        );

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, InferenceError> {
        Self::new(LocalInferenceConfig::default())
    }

    fn backend(&self) -> &'static str {
        ProviderIdentity::LocalInference.backend_name()
    }

    /// Sibling `models` URL used for health checks
    fn models_url(&self) -> String {
        let url = self.endpoint.as_str();
        url.strip_suffix("/chat/completions")
            .map_or_else(|| url.to_string(), |base| format!("{base}/models"))
    }

    fn transport_error(&self, err: &reqwest::Error) -> InferenceError {
        InferenceError::from_transport(self.backend(), self.config.timeout_ms, err)
    }
}

/// OpenAI-format chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI-format chat response; every field is optional so that a missing
/// completion is reported as a malformed response rather than a parse error
#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl InferenceEngine for LocalInferenceEngine {
    #[instrument(
        skip(self, request),
        fields(endpoint = %self.endpoint, prompt_len = request.prompt.len())
    )]
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        request.ensure_prompt()?;

        let body = ChatRequest {
            model: self.config.model.as_deref(),
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Sending request to local inference server");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            warn!(status = %status, body = %text, "Local inference request failed");
            return Err(InferenceError::Rejected {
                backend: self.backend().to_string(),
                status: status.as_u16(),
                detail: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Local inference response is not valid JSON");
            InferenceError::malformed(self.backend(), e.to_string())
        })?;

        let usage = parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let Some(choice) = parsed.choices.into_iter().next() else {
            warn!(body = %text, "Local inference response has no choices");
            return Err(InferenceError::malformed(self.backend(), "missing choices[0]"));
        };
        let finish_reason = choice.finish_reason;
        let Some(content) = choice.message.and_then(|m| m.content) else {
            warn!(body = %text, "Local inference response has no message content");
            return Err(InferenceError::malformed(
                self.backend(),
                "missing choices[0].message.content",
            ));
        };

        debug!(tokens = ?usage, "Local inference completed");

        Ok(InferenceResponse {
            content,
            model: parsed
                .model
                .unwrap_or_else(|| self.default_model().to_string()),
            usage,
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, InferenceError> {
        let response = self
            .client
            .get(self.models_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) if e.is_timeout() || e.is_connect() => Ok(false),
            Err(e) => Err(self.transport_error(&e)),
        }
    }

    fn default_model(&self) -> &str {
        self.config.model.as_deref().unwrap_or(SERVER_LOADED_MODEL)
    }

    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::LocalInference
    }
}
