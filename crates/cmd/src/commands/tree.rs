use anyhow::Result;
use deskfs::{Entry, Vfs};

pub async fn tree_command(fs: &Vfs, path: &str) -> Result<()> {
    println!("{}", path);
    // Explicit stack; raw child entries, so directory symlinks print as
    // links instead of recursing
    let mut stack: Vec<(Entry, usize)> = Vec::new();
    for child in fs.list(path).await?.into_iter().rev() {
        stack.push((child, 1));
    }
    while let Some((entry, depth)) = stack.pop() {
        println!("{}{}", "  ".repeat(depth), label(&entry));
        if entry.is_dir() {
            for child in fs.list(entry.path()).await?.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    Ok(())
}

fn label(entry: &Entry) -> String {
    match entry {
        Entry::Directory(_) => format!("{}/", entry.name()),
        Entry::Symlink(l) => format!("{} -> {}", entry.name(), l.target),
        Entry::File(_) => entry.name().to_string(),
    }
}
