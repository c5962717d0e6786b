use std::path::Path;

use anyhow::Result;

use crate::common::open_fs;
use diagnostics::log_info;

pub async fn init_command(root: &Path) -> Result<()> {
    let fs = open_fs(root).await?;
    let top_level = fs.list("/").await?;

    log_info!("initialized filesystem at {root}", root: root.display().to_string());
    println!(
        "Initialized filesystem at {} with {} top-level directories",
        root.display(),
        top_level.len()
    );
    Ok(())
}
