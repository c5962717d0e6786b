use std::path::Path;

use anyhow::Result;
use journal::JournalEngine;

pub async fn compact_command(root: &Path) -> Result<()> {
    let engine = JournalEngine::open(root).await?;
    engine.compact().await?;
    println!("journal compacted at {}", root.display());
    Ok(())
}
