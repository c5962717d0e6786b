use anyhow::Result;
use deskfs::Vfs;

pub async fn link_command(fs: &Vfs, link: &str, target: &str, parents: bool) -> Result<()> {
    fs.symlink(link, target, parents).await?;
    println!("linked {} -> {}", link, target);
    Ok(())
}

pub async fn readlink_command(fs: &Vfs, path: &str) -> Result<()> {
    match fs.read_link(path).await? {
        Some(target) => println!("{}", target),
        None => println!("{}: absent", path),
    }
    Ok(())
}
