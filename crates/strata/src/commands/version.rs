pub fn run() -> anyhow::Result<()> {
    println!("strata {}", env!("CARGO_PKG_VERSION"));
    println!("Hierarchical leveled memory store");
    Ok(())
}
