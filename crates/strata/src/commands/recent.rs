use super::Options;
use strata_store::{EntryKind, SummaryPointer};

fn format_entry(pointer: &SummaryPointer) -> String {
    let when = match pointer.kind {
        EntryKind::Message => pointer
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        EntryKind::PeriodSummary => {
            let (start, end) = pointer.span();
            let fmt = |t: Option<chrono::DateTime<chrono::Utc>>| {
                t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "?".to_string())
            };
            format!("{} .. {}", fmt(start), fmt(end))
        }
    };
    let summary = pointer.summary.lines().next().unwrap_or_default();
    format!(
        "  L{} {} | {} ({})",
        pointer.level, when, summary, pointer.reference
    )
}

pub async fn run(opts: &Options, limit: usize, json: bool) -> anyhow::Result<()> {
    let memory = opts.open_memory()?;
    let recent = memory.recent(limit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&recent)?);
        return Ok(());
    }

    if recent.is_empty() {
        println!("No memories stored yet.");
        return Ok(());
    }

    println!("Recent memories (last {})", recent.len());
    println!("=========================");
    for pointer in &recent {
        println!("{}", format_entry(pointer));
    }
    Ok(())
}
