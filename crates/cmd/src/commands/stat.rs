use anyhow::Result;
use deskfs::{Entry, Vfs};

use crate::common::{format_file_size, format_timestamp, kind_marker};

pub async fn stat_command(fs: &Vfs, path: &str, no_follow: bool) -> Result<()> {
    let entry = if no_follow {
        fs.lstat(path).await?
    } else {
        fs.stat(path).await?
    };
    match entry {
        None => println!("{}: absent", path),
        Some(entry) => {
            println!("path:     {}", entry.path());
            println!("kind:     {} ({})", entry.kind(), kind_marker(entry.kind()));
            println!("created:  {}", format_timestamp(entry.created_at()));
            match &entry {
                Entry::File(f) => {
                    println!("modified: {}", format_timestamp(f.modified_at));
                    println!("size:     {}", format_file_size(f.size));
                    println!("chunks:   {}", f.chunk_count);
                    if let Some(content_type) = &f.content_type {
                        println!("type:     {}", content_type);
                    }
                }
                Entry::Symlink(l) => {
                    println!("modified: {}", format_timestamp(l.modified_at));
                    println!("target:   {}", l.target);
                }
                Entry::Directory(_) => {}
            }
        }
    }
    Ok(())
}
