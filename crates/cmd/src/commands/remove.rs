use anyhow::Result;
use deskfs::Vfs;

pub async fn remove_command(fs: &Vfs, path: &str, recursive: bool) -> Result<()> {
    fs.remove(path, recursive).await?;
    println!("removed {}", path);
    Ok(())
}
