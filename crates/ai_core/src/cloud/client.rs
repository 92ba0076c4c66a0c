//! Gemini REST client

use async_trait::async_trait;
use domain::ProviderIdentity;
use reqwest::Client;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::{API_CREDENTIAL_VAR, CloudInferenceConfig};
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Cloud inference engine backed by the Gemini API
pub struct CloudInferenceEngine {
    client: Client,
    config: CloudInferenceConfig,
    api_key: SecretString,
}

impl std::fmt::Debug for CloudInferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudInferenceEngine")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl CloudInferenceEngine {
    /// Create a new cloud inference engine
    ///
    /// Fails with `InferenceError::Configuration` when no credential is
    /// configured. No network traffic happens here.
    pub fn new(config: CloudInferenceConfig) -> Result<Self, InferenceError> {
        let api_key = config
            .api_key_str()
            .map(|key| SecretString::from(key.to_string()))
            .ok_or_else(|| {
                InferenceError::Configuration(format!(
                    "{API_CREDENTIAL_VAR} is not set; the cloud provider needs an API credential"
                ))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized cloud inference engine"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn backend(&self) -> &'static str {
        ProviderIdentity::CloudApi.backend_name()
    }

    fn model_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn generate_url(&self) -> String {
        format!("{}:generateContent", self.model_url())
    }

    fn transport_error(&self, err: &reqwest::Error) -> InferenceError {
        InferenceError::from_transport(self.backend(), self.config.timeout_ms, err)
    }

    fn api_key(&self) -> &str {
        secrecy::ExposeSecret::expose_secret(&self.api_key)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

/// Concatenate the text parts of the first candidate
fn candidate_text(candidate: Candidate) -> Option<String> {
    let texts: Vec<String> = candidate
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

#[async_trait]
impl InferenceEngine for CloudInferenceEngine {
    #[instrument(
        skip(self, request),
        fields(model = %self.config.model, prompt_len = request.prompt.len())
    )]
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        request.ensure_prompt()?;

        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: "text/plain",
            },
        };

        debug!("Sending request to cloud API");

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, self.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            warn!(status = %status, body = %text, "Cloud inference request failed");
            return Err(InferenceError::Rejected {
                backend: self.backend().to_string(),
                status: status.as_u16(),
                detail: text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Cloud inference response is not valid JSON");
            InferenceError::malformed(self.backend(), e.to_string())
        })?;

        let usage = parsed.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            warn!(body = %text, "Cloud inference response has no candidates");
            return Err(InferenceError::malformed(self.backend(), "missing candidates[0]"));
        };
        let finish_reason = candidate.finish_reason.clone();
        let Some(content) = candidate_text(candidate) else {
            warn!(body = %text, "Cloud inference response has no text parts");
            return Err(InferenceError::malformed(
                self.backend(),
                "missing candidates[0].content.parts[].text",
            ));
        };

        debug!(tokens = ?usage, "Cloud inference completed");

        Ok(InferenceResponse {
            content,
            model: parsed
                .model_version
                .unwrap_or_else(|| self.config.model.clone()),
            usage,
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, InferenceError> {
        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, self.api_key())
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
        &self.config.model
    }

    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::CloudApi
    }
}
