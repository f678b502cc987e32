use super::Options;

pub fn run(opts: &Options) -> anyhow::Result<()> {
    let memory = opts.open_memory()?;
    let config = memory.config();

    println!("✓ Memory ready at {}", config.base_dir.display());
    println!("  threshold: {}", config.threshold);
    println!("  max depth: {}", config.max_depth);
    Ok(())
}
