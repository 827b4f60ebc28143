//! Configuration module
//!
//! Values come from the environment with defaults from utils/constants.rs.
//! The completion API key is never logged.

use std::net::SocketAddr;
use tracing::{info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    API_KEY_ENV_VARS, API_KEY_PLACEHOLDERS, DEFAULT_COMPLETIONS_URL, DEFAULT_HOST,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_TEMPERATURE,
};

/// Settings for the chat-completion risk detector
#[derive(Clone)]
pub struct DetectorConfig {
    /// Bearer credential; `None` until configured
    pub api_key: Option<String>,
    /// Chat-completions endpoint
    pub completions_url: String,
    /// Model name sent with each request
    pub model: String,
    /// Completion token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            completions_url: DEFAULT_COMPLETIONS_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

// Manual Debug so the key never reaches a log line.
impl std::fmt::Debug for DetectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<hidden>"))
            .field("completions_url", &self.completions_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl DetectorConfig {
    /// Load from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();
        config.api_key = Self::api_key_from_env();

        if let Some(url) = env_non_empty("RISKBOT_COMPLETIONS_URL") {
            config.completions_url = url;
        }
        if let Some(model) = env_non_empty("RISKBOT_MODEL") {
            config.model = model;
        }
        if let Some(raw) = env_non_empty("RISKBOT_MAX_TOKENS") {
            config.max_tokens = raw
                .parse()
                .map_err(|_| AppError::invalid_config("RISKBOT_MAX_TOKENS", &raw))?;
        }
        if let Some(raw) = env_non_empty("RISKBOT_TEMPERATURE") {
            config.temperature = raw
                .parse()
                .map_err(|_| AppError::invalid_config("RISKBOT_TEMPERATURE", &raw))?;
        }

        Ok(config)
    }

    /// First configured, non-placeholder key
    fn api_key_from_env() -> Option<String> {
        for var in API_KEY_ENV_VARS {
            if let Some(key) = env_non_empty(var) {
                if is_real_key(&key) {
                    info!("🔑 {} configured (key hidden)", var);
                    return Some(key);
                }
                warn!("⚠️ {} holds a placeholder value, ignoring it", var);
            }
        }
        None
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = is_real_key(&key).then_some(key);
        self
    }

    pub fn with_completions_url(mut self, url: impl Into<String>) -> Self {
        self.completions_url = url.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Bind address for the local game API
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// `RISKBOT_HOST`, then `PORT` falling back to `RISKBOT_PORT`
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();
        if let Some(host) = env_non_empty("RISKBOT_HOST") {
            config.host = host;
        }
        if let Some((var, raw)) = env_non_empty("PORT")
            .map(|p| ("PORT", p))
            .or_else(|| env_non_empty("RISKBOT_PORT").map(|p| ("RISKBOT_PORT", p)))
        {
            config.port = raw.parse().map_err(|_| AppError::invalid_config(var, &raw))?;
        }
        Ok(config)
    }

    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| AppError::invalid_config("RISKBOT_HOST", &raw))
    }
}

fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_real_key(key: &str) -> bool {
    !key.trim().is_empty() && !API_KEY_PLACEHOLDERS.contains(&key.trim())
}
