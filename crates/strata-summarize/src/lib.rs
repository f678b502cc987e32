//! Summarization collaborators for leveled memory

mod client;
mod config;
mod fallback;
mod prompt;

use async_trait::async_trait;
use serde_json::Value;
use strata_store::Record;
use thiserror::Error;

pub use client::ChatCompletionSummarizer;
pub use config::SummarizerConfig;
pub use fallback::{
    extract_sentences, ExtractiveSummarizer, DESCRIPTION_PLACEHOLDER, PERIOD_PLACEHOLDER,
};
pub use prompt::{clamp_chars, MAX_DESCRIPTION_CHARS};

/// Produces the text stored alongside records
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short description of one record's content
    async fn describe(&self, content: &Value) -> Result<String>;

    /// Aggregate summary of a batch of records being promoted
    async fn summarize_period(&self, batch: &[Record]) -> Result<String>;
}

/// Summarizer failures; callers degrade to placeholder text
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarizer returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed summarizer response: {0}")]
    MalformedResponse(String),

    #[error("summarizer not configured: {0}")]
    NotConfigured(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SummarizeError>;
