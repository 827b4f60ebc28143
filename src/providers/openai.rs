//! Chat-completion risk detector
//!
//! Sends the contract to an OpenAI-compatible `/chat/completions` endpoint
//! with a fixed prompt and parses the JSON risk array out of the reply.
//! One POST per detection run: no retry, no streaming, no client timeout.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

use crate::models::config::DetectorConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::Risk;
use crate::providers::detector::RiskDetector;
use crate::providers::response::parse_completion;
use crate::utils::constants::{build_risk_prompt, SYSTEM_PROMPT, USER_AGENT as USER_AGENT_CONST};

/// Chat-completions request body
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Detector backed by a chat-completions endpoint
#[derive(Clone)]
pub struct OpenAiDetector {
    client: reqwest::Client,
    config: DetectorConfig,
}

impl OpenAiDetector {
    pub fn new(config: DetectorConfig) -> AppResult<Self> {
        let client = Self::build_client()?;
        Ok(Self { client, config })
    }

    /// Detector configured from environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::new(DetectorConfig::from_env()?)
    }

    fn build_client() -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Request body for `contract_text`
    pub fn build_request<'a>(&'a self, contract_text: &str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_risk_prompt(contract_text),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::missing_api_key("OPENAI_API_KEY"))
    }
}

#[async_trait]
impl RiskDetector for OpenAiDetector {
    fn backend_tag(&self) -> &'static str {
        "openai_chat"
    }

    fn ensure_ready(&self) -> AppResult<()> {
        self.api_key().map(|_| ())
    }

    async fn detect_risks(&self, contract_text: &str) -> AppResult<Vec<Risk>> {
        let api_key = self.api_key()?;
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| AppError::invalid_config("OPENAI_API_KEY", "<hidden>"))?;

        let start = Instant::now();
        info!(
            model = %self.config.model,
            chars = contract_text.chars().count(),
            "🔍 Requesting risk detection"
        );

        let response = self
            .client
            .post(&self.config.completions_url)
            .header(AUTHORIZATION, auth)
            .json(&self.build_request(contract_text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "⚠️ Completion API rejected the request");
            return Err(AppError::detection_network(format!(
                "Error contacting the completion API (HTTP {}). Check your key and try again.",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        let risks = parse_completion(&body)?;

        info!(
            risks = risks.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "✅ Risk detection complete"
        );
        Ok(risks)
    }
}
