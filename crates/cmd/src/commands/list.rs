use anyhow::Result;
use deskfs::Vfs;

use crate::common::format_entry_line;

pub async fn list_command(fs: &Vfs, path: &str) -> Result<()> {
    for entry in fs.list(path).await? {
        println!("{}", format_entry_line(&entry));
    }
    Ok(())
}
