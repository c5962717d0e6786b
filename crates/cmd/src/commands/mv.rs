use anyhow::Result;
use deskfs::{MoveOptions, Vfs};

pub async fn mv_command(fs: &Vfs, src: &str, dest: &str, overwrite: bool) -> Result<()> {
    fs.move_to(src, dest, MoveOptions { overwrite }).await?;
    println!("moved {} -> {}", src, dest);
    Ok(())
}
