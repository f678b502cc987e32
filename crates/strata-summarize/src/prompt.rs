use crate::config::SummarizerConfig;
use crate::{Result, SummarizeError};
use serde_json::Value;
use strata_store::Record;

/// Upper bound on a short description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 100;

const MAX_INPUT_CHARS: usize = 60_000;

pub(crate) const DESCRIBE_INSTRUCTION: &str = "Write a short description (no more than 100 \
characters) of the following text or dialog. The description must capture the essence of the \
interaction.";

pub(crate) const PERIOD_INSTRUCTION: &str = "You maintain a hierarchical memory organized in levels.

Level 0: original messages and dialogs
Level 1: summaries of groups of level 0 messages
Level 2: summaries of groups of level 1 summaries
And so on; every level is more general than the one below it.

Your task:
1. Write a detailed summary that moves this group to the next level
2. Include the key topics, decisions and conclusions
3. Keep details that may be needed later
4. Structure the information so it is easy to search

Summary format:
1. Period: [start date] - [end date]
2. Main topics: [list]
3. Key events: [list]
4. Decisions: [list]
5. Conclusions: [text]";

/// Text form of record content: strings verbatim, anything else as JSON
pub(crate) fn content_as_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn period_payload(batch: &[Record]) -> Result<String> {
    let json = serde_json::to_string(batch)?;
    Ok(truncate_chars(&json, MAX_INPUT_CHARS).to_string())
}

pub(crate) fn request_body(config: &SummarizerConfig, instruction: &str, input: &str) -> Value {
    serde_json::json!({
        "model": config.model,
        "messages": [
            {"role": "system", "content": instruction},
            {"role": "user", "content": truncate_chars(input, MAX_INPUT_CHARS)}
        ],
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "stream": false
    })
}

/// Pull `choices[0].message.content` out of a completion response
pub(crate) fn extract_completion(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
        .ok_or_else(|| {
            let detail = body["error"]["message"]
                .as_str()
                .unwrap_or("missing choices[0].message.content");
            SummarizeError::MalformedResponse(detail.to_string())
        })
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Bound `text` to `max` characters, marking the cut with "..."
pub fn clamp_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept = truncate_chars(text, max.saturating_sub(3));
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_format() {
        let config = SummarizerConfig::new();
        let body = request_body(&config, DESCRIBE_INSTRUCTION, "some dialog");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "some dialog");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_extract_completion() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  Talked about rust.  "}}]
        });
        assert_eq!(extract_completion(&body).unwrap(), "Talked about rust.");
    }

    #[test]
    fn test_extract_completion_rejects_empty_and_errors() {
        let empty = serde_json::json!({"choices": [{"message": {"content": ""}}]});
        assert!(matches!(
            extract_completion(&empty),
            Err(SummarizeError::MalformedResponse(_))
        ));

        let error = serde_json::json!({"error": {"message": "quota exceeded"}});
        match extract_completion(&error) {
            Err(SummarizeError::MalformedResponse(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_content_as_text() {
        assert_eq!(content_as_text(&Value::String("hi".into())), "hi");
        assert_eq!(
            content_as_text(&serde_json::json!({"role": "user"})),
            r#"{"role":"user"}"#
        );
    }

    #[test]
    fn test_clamp_chars() {
        assert_eq!(clamp_chars("short", 10), "short");
        let clamped = clamp_chars("привет мир, как дела сегодня", 10);
        assert_eq!(clamped.chars().count(), 10);
        assert!(clamped.ends_with("..."));
    }
}
