//! Google Gemini text generation backend for Sakhi

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use reqwest::Client;
use sakhi_core::{get_env_or, Result, SakhiConfig, SakhiError, TextGenerator};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Public Generative Language API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Shared HTTP client for connection pooling
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or initialize the shared HTTP client
fn get_http_client() -> Client {
    HTTP_CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_max_idle_per_host(8)
                .pool_idle_timeout(std::time::Duration::from_secs(300))
                .tcp_keepalive(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!("Falling back to default HTTP client: {}", e);
                    Client::new()
                })
        })
        .clone()
}

/// Gemini connection settings
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header
    pub api_key: String,
    /// Model name, e.g. `gemini-1.5-pro-latest`
    pub model: String,
    /// API root without a trailing slash
    pub base_url: String,
    /// Sampling temperature; server default when unset
    pub temperature: Option<f32>,
    /// Output token cap; server default when unset
    pub max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl GeminiConfig {
    /// Config for `model` against the public endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Derive from the application config.
    ///
    /// `GEMINI_BASE_URL`, `GEMINI_TEMPERATURE` and `GEMINI_MAX_OUTPUT_TOKENS`
    /// are optional overrides.
    pub fn from_config(config: &SakhiConfig) -> Self {
        Self {
            base_url: get_env_or("GEMINI_BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            temperature: std::env::var("GEMINI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok()),
            max_output_tokens: std::env::var("GEMINI_MAX_OUTPUT_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok()),
            ..Self::new(
                config.credentials.gemini_api_key.clone(),
                config.gemini_model.clone(),
            )
        }
    }

    /// Point at a different API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token cap
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[allow(dead_code)]
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Result<String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(SakhiError::model(format!("Gemini returned no reply: {}", reason)));
        };

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default())
    }
}

/// Gemini `generateContent` client
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider with the shared connection pool
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: get_http_client(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn request_body(&self, prompt: &str) -> GenerateContentRequest {
        let generation_config = match (self.config.temperature, self.config.max_output_tokens) {
            (None, None) => None,
            (temperature, max_output_tokens) => Some(GenerationConfig {
                temperature,
                max_output_tokens,
            }),
        };
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let started = std::time::Instant::now();

        let resp = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", self.config.api_key.as_str())
            .header("content-type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                SakhiError::model(format!("Gemini request failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(SakhiError::model(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| {
                SakhiError::model(format!("Malformed Gemini response: {}", e.without_url()))
            })?;
        let text = body.into_text()?;

        tracing::debug!(
            model = %self.config.model,
            latency_ms = started.elapsed().as_millis() as u64,
            chars = text.len(),
            "Gemini reply received"
        );
        Ok(text)
    }
}
