use anyhow::Result;
use deskfs::{CopyOptions, Vfs};

pub async fn copy_command(
    fs: &Vfs,
    src: &str,
    dest: &str,
    overwrite: bool,
    follow_symlinks: bool,
) -> Result<()> {
    fs.copy(
        src,
        dest,
        CopyOptions {
            overwrite,
            follow_symlinks,
        },
    )
    .await?;
    println!("copied {} -> {}", src, dest);
    Ok(())
}
