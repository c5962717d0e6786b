// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use deskfs::{Entry, EntryKind, Vfs};
use journal::JournalEngine;

/// Filesystem root with an optional override, falling back to the
/// DESKFS_ROOT environment variable.
pub fn resolve_root(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }
    env::var("DESKFS_ROOT")
        .map(PathBuf::from)
        .map_err(|_| anyhow!("DESKFS_ROOT environment variable not set (or pass --root)"))
}

/// Opens the journal-backed filesystem under `root` and runs the
/// idempotent bootstrap.
pub async fn open_fs(root: &Path) -> Result<Vfs> {
    let engine = JournalEngine::open(root).await?;
    let fs = Vfs::new(engine);
    fs.init().await?;
    Ok(fs)
}

/// Helper function to format file sizes
pub fn format_file_size(size: u64) -> String {
    if size >= 1024 * 1024 {
        format!("{:.1}MB", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1}KB", size as f64 / 1024.0)
    } else {
        format!("{}B", size)
    }
}

/// Unix-millis timestamp rendered for listings.
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn kind_marker(kind: EntryKind) -> char {
    match kind {
        EntryKind::Directory => 'd',
        EntryKind::File => 'f',
        EntryKind::Symlink => 'l',
    }
}

/// One listing line: marker, size, mtime, name, link target.
pub fn format_entry_line(entry: &Entry) -> String {
    match entry {
        Entry::File(f) => format!(
            "f {:>8}  {}  {}",
            format_file_size(f.size),
            format_timestamp(f.modified_at),
            entry.name()
        ),
        Entry::Directory(d) => format!(
            "d {:>8}  {}  {}/",
            "-",
            format_timestamp(d.created_at),
            entry.name()
        ),
        Entry::Symlink(l) => format!(
            "l {:>8}  {}  {} -> {}",
            "-",
            format_timestamp(l.modified_at),
            entry.name(),
            l.target
        ),
    }
}
