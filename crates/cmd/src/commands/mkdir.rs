use anyhow::Result;
use deskfs::Vfs;

use diagnostics::log_debug;

pub async fn mkdir_command(fs: &Vfs, path: &str, parents: bool) -> Result<()> {
    log_debug!("creating directory {path}", path: path);

    fs.mkdir(path, parents).await?;
    println!("created {}", path);
    Ok(())
}
