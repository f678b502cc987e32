//! Configuration for the chat-completion summarizer

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.aitunnel.ru/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Summarizer endpoint and generation parameters
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Base URL of a chat-completions compatible API
    pub base_url: String,

    /// Bearer token; the HTTP summarizer refuses to start without one
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    pub model: String,

    /// Completion length bound
    pub max_tokens: u32,

    pub temperature: f32,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl SummarizerConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: 0.3,
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Defaults overlaid with `STRATA_API_BASE`, `STRATA_API_KEY`, `STRATA_MODEL`
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(url) = std::env::var("STRATA_API_BASE") {
            config.base_url = url;
        }
        config.api_key = std::env::var("STRATA_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if let Ok(model) = std::env::var("STRATA_MODEL") {
            config.model = model;
        }
        config
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self::new()
    }
}
