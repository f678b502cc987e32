use super::Options;

pub async fn run(opts: &Options) -> anyhow::Result<()> {
    let memory = opts.open_memory()?;
    let counts = memory.level_counts().await;
    let config = memory.config();

    let output = serde_json::json!({
        "dir": config.base_dir.display().to_string(),
        "threshold": config.threshold,
        "max_depth": config.max_depth,
        "active": counts.values().sum::<usize>(),
        "levels": counts
            .iter()
            .map(|(level, count)| (level.to_string(), serde_json::json!(count)))
            .collect::<serde_json::Map<_, _>>(),
    });

    println!("{output}");
    Ok(())
}
