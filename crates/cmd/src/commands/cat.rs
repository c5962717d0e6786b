use std::io::Write;

use anyhow::Result;
use deskfs::Vfs;
use futures::StreamExt;

/// Streams file content chunk by chunk rather than buffering the whole
/// file.
pub async fn cat_command(fs: &Vfs, path: &str) -> Result<()> {
    let mut stream = fs.read_file_stream(path).await?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    while let Some(chunk) = stream.next().await {
        out.write_all(&chunk?)?;
    }
    out.flush()?;
    Ok(())
}
