use crate::prompt::{clamp_chars, content_as_text, MAX_DESCRIPTION_CHARS};
use crate::{Result, Summarizer};
use async_trait::async_trait;
use serde_json::Value;
use strata_store::Record;

/// Stored when a short description cannot be produced
pub const DESCRIPTION_PLACEHOLDER: &str = "Short description unavailable";

/// Stored when a period summary cannot be produced
pub const PERIOD_PLACEHOLDER: &str = "Period summary unavailable";

const MAX_PERIOD_CHARS: usize = 2000;

/// First `max_sentences` sentences of `content`
pub fn extract_sentences(content: &str, max_sentences: usize) -> String {
    let sentences: Vec<&str> = content
        .split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(max_sentences)
        .collect();

    sentences.join(". ")
}

/// Offline summarizer built from the leading sentences of each record
#[derive(Debug, Clone, Default)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous description, also used when recovering orphaned records
    pub fn describe_now(&self, content: &Value) -> String {
        let text = extract_sentences(&content_as_text(content), 1);
        if text.is_empty() {
            return DESCRIPTION_PLACEHOLDER.to_string();
        }
        clamp_chars(&text, MAX_DESCRIPTION_CHARS)
    }

    fn describe_record(&self, record: &Record) -> String {
        match record {
            Record::Message(m) => self.describe_now(&m.content),
            Record::Period(p) => clamp_chars(
                &extract_sentences(&p.period_summary, 1),
                MAX_DESCRIPTION_CHARS,
            ),
        }
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn describe(&self, content: &Value) -> Result<String> {
        Ok(self.describe_now(content))
    }

    async fn summarize_period(&self, batch: &[Record]) -> Result<String> {
        let (Some(first), Some(last)) = (batch.first(), batch.last()) else {
            return Ok(PERIOD_PLACEHOLDER.to_string());
        };

        let lines: Vec<String> = batch
            .iter()
            .map(|r| format!("- {}", self.describe_record(r)))
            .collect();
        let text = format!(
            "Period: {} - {}\n{}",
            first.timestamp().to_rfc3339(),
            last.timestamp().to_rfc3339(),
            lines.join("\n")
        );
        Ok(clamp_chars(&text, MAX_PERIOD_CHARS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_sentences() {
        let text = "First sentence. Second sentence! Third sentence?";
        let extracted = extract_sentences(text, 2);
        assert!(extracted.contains("First sentence"));
        assert!(extracted.contains("Second sentence"));
        assert!(!extracted.contains("Third"));
    }

    #[test]
    fn test_describe_is_bounded() {
        let summarizer = ExtractiveSummarizer::new();
        let long = "word ".repeat(200);
        let description = summarizer.describe_now(&json!(long));
        assert!(description.chars().count() <= MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_describe_empty_uses_placeholder() {
        let summarizer = ExtractiveSummarizer::new();
        assert_eq!(summarizer.describe_now(&json!("")), DESCRIPTION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_period_summary_lists_members() {
        let summarizer = ExtractiveSummarizer::new();
        let batch = vec![
            Record::message(json!("We planned the release. Then lunch.")),
            Record::message(json!({"role": "user", "content": "ship it"})),
        ];

        let summary = summarizer.summarize_period(&batch).await.unwrap();
        assert!(summary.starts_with("Period: "));
        assert!(summary.contains("- We planned the release"));
        assert!(summary.contains("ship it"));
        assert!(!summary.contains("Then lunch"));
    }

    #[tokio::test]
    async fn test_period_summary_of_empty_batch() {
        let summarizer = ExtractiveSummarizer::new();
        assert_eq!(
            summarizer.summarize_period(&[]).await.unwrap(),
            PERIOD_PLACEHOLDER
        );
    }
}
