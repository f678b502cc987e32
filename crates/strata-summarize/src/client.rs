use crate::config::SummarizerConfig;
use crate::prompt::{
    clamp_chars, content_as_text, extract_completion, period_payload, request_body,
    DESCRIBE_INSTRUCTION, MAX_DESCRIPTION_CHARS, PERIOD_INSTRUCTION,
};
use crate::{Result, SummarizeError, Summarizer};
use async_trait::async_trait;
use serde_json::Value;
use strata_store::Record;

/// Summarizer backed by a chat-completions endpoint
pub struct ChatCompletionSummarizer {
    client: reqwest::Client,
    config: SummarizerConfig,
    api_key: String,
}

impl ChatCompletionSummarizer {
    pub fn new(config: SummarizerConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| SummarizeError::NotConfigured("no API key set".to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    async fn complete(&self, instruction: &str, input: &str) -> Result<String> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body(&self.config, instruction, input))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body: clamp_chars(&body, 500),
            });
        }

        let body: Value = response.json().await?;
        extract_completion(&body)
    }
}

#[async_trait]
impl Summarizer for ChatCompletionSummarizer {
    async fn describe(&self, content: &Value) -> Result<String> {
        let text = self
            .complete(DESCRIBE_INSTRUCTION, &content_as_text(content))
            .await?;
        Ok(clamp_chars(&text, MAX_DESCRIPTION_CHARS))
    }

    async fn summarize_period(&self, batch: &[Record]) -> Result<String> {
        tracing::debug!(records = batch.len(), model = %self.config.model, "requesting period summary");
        self.complete(PERIOD_INSTRUCTION, &period_payload(batch)?)
            .await
    }
}
