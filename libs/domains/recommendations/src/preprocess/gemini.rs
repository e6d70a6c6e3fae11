use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::shortener::{QueryShortener, keyword_prompt};
use crate::error::{RecommendError, RecommendResult};

/// Google Gemini `generateContent` settings
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_millis(3000),
        }
    }
}

impl FromEnv for GeminiConfig {
    /// - GEMINI_API_KEY: required
    /// - GEMINI_MODEL: defaults to gemini-1.5-flash
    /// - GEMINI_BASE_URL: defaults to the public v1beta endpoint
    /// - PREPROCESS_TIMEOUT_MS: defaults to 3000
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::new(env_required("GEMINI_API_KEY")?);
        let timeout_ms = env_parse("PREPROCESS_TIMEOUT_MS", defaults.timeout.as_millis() as u64)?;

        Ok(Self {
            model: env_or_default("GEMINI_MODEL", &defaults.model),
            base_url: env_or_default("GEMINI_BASE_URL", &defaults.base_url),
            timeout: Duration::from_millis(timeout_ms),
            ..defaults
        })
    }
}

pub struct GeminiShortener {
    client: Client,
    config: GeminiConfig,
}

impl GeminiShortener {
    pub fn new(config: GeminiConfig) -> RecommendResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecommendError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[async_trait]
impl QueryShortener for GeminiShortener {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn shorten(&self, query: &str) -> RecommendResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(keyword_prompt(query)),
                }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.base_url.trim_end_matches('/'),
                self.config.model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecommendError::Preprocessing(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecommendError::Preprocessing(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RecommendError::Preprocessing(format!("malformed response: {}", e)))?;

        let text = body
            .into_text()
            .ok_or_else(|| RecommendError::Preprocessing("empty completion".to_string()))?;

        debug!(keywords = %text, "Query shortened");
        Ok(text)
    }
}
