use super::Options;

pub async fn run(opts: &Options) -> anyhow::Result<()> {
    let memory = opts.open_memory()?;
    let report = memory.reconcile().await?;

    if !report.changed() && report.skipped == 0 {
        println!("✓ Index consistent with record files");
        return Ok(());
    }

    println!("Reconciled operative index");
    println!("  recovered:  {}", report.recovered);
    println!("  stale:      {}", report.dropped_stale);
    println!("  archived:   {}", report.dropped_archived);
    println!("  duplicates: {}", report.dropped_duplicates);
    println!("  normalized: {}", report.normalized);
    println!("  skipped:    {}", report.skipped);
    Ok(())
}
