use super::Options;
use serde_json::Value;
use std::io::Read;

fn read_content(content: Option<String>) -> anyhow::Result<String> {
    match content {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn to_value(raw: String, json: bool) -> anyhow::Result<Value> {
    if json {
        return serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("content is not valid JSON: {}", e));
    }
    let trimmed = raw.trim_end_matches(['\n', '\r']);
    if trimmed.trim().is_empty() {
        anyhow::bail!("nothing to save: content is empty");
    }
    Ok(Value::String(trimmed.to_string()))
}

pub async fn run(opts: &Options, content: Option<String>, json: bool) -> anyhow::Result<()> {
    let value = to_value(read_content(content)?, json)?;
    let memory = opts.open_memory()?;
    let id = memory.save(value).await?;
    println!("{id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_value_text() {
        let value = to_value("hello\n".to_string(), false).unwrap();
        assert_eq!(value, Value::String("hello".to_string()));
    }

    #[test]
    fn test_to_value_json() {
        let value = to_value(r#"{"role":"user","content":"hi"}"#.to_string(), true).unwrap();
        assert_eq!(value["role"], "user");
        assert!(to_value("{oops".to_string(), true).is_err());
    }

    #[test]
    fn test_to_value_rejects_empty() {
        assert!(to_value("  \n".to_string(), false).is_err());
    }

    #[tokio::test]
    async fn test_save_writes_record() {
        let dir = tempfile::tempdir().unwrap();
        let opts = super::super::offline_options(dir.path());
        run(&opts, Some("first note".to_string()), false).await.unwrap();

        let memory = opts.open_memory().unwrap();
        let recent = memory.recent(1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].summary, "first note");
    }
}
