use anyhow::Result;
use deskfs::{Vfs, WriteOptions};
use tokio::io::AsyncReadExt;

pub async fn write_command(
    fs: &Vfs,
    path: &str,
    content: Option<String>,
    content_type: Option<String>,
    parents: bool,
) -> Result<()> {
    let opts = WriteOptions {
        content_type,
        parents,
        ..Default::default()
    };
    match content {
        Some(text) => fs.write_file(path, text, opts).await?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            fs.write_file(path, buf, opts).await?;
        }
    }
    println!("wrote {}", path);
    Ok(())
}
