use super::Options;

pub fn run(opts: &Options, level: u32, id: &str) -> anyhow::Result<()> {
    let memory = opts.open_memory()?;
    let record = memory.load(level, id)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
