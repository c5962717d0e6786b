use serde::{Deserialize, Serialize};

use crate::path::{entry_name, parent_path};

/// Entry kind discriminant for listings, persistence, and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file entry
    File,
    /// Directory entry
    Directory,
    /// Symbolic link entry
    Symlink,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(EntryKind::File),
            "directory" => Ok(EntryKind::Directory),
            "symlink" => Ok(EntryKind::Symlink),
            other => Err(format!("Unknown entry kind: {}", other)),
        }
    }
}

/// Stored record for a regular file.
///
/// `size` and `chunk_count` always describe the chunk table: indices
/// `0..chunk_count` exist contiguously and concatenate to exactly
/// `size` bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub parent: String,
    pub created_at: i64,
    pub modified_at: i64,
    pub size: u64,
    pub content_type: Option<String>,
    pub chunk_count: u32,
}

/// Stored record for a directory. Children are found through the
/// parent-path secondary index, not through the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub path: String,
    pub parent: String,
    pub created_at: i64,
}

/// Stored record for a symbolic link. The target is a path string that
/// is not required to exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymlinkEntry {
    pub path: String,
    pub parent: String,
    pub created_at: i64,
    pub modified_at: i64,
    pub target: String,
}

/// One filesystem entry. The path is the unique identity; every
/// non-root entry's parent denotes an existing Directory record. Root
/// itself has no stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    File(FileEntry),
    Directory(DirectoryEntry),
    Symlink(SymlinkEntry),
}

impl Entry {
    pub fn path(&self) -> &str {
        match self {
            Entry::File(f) => &f.path,
            Entry::Directory(d) => &d.path,
            Entry::Symlink(l) => &l.path,
        }
    }

    pub fn parent(&self) -> &str {
        match self {
            Entry::File(f) => &f.parent,
            Entry::Directory(d) => &d.parent,
            Entry::Symlink(l) => &l.parent,
        }
    }

    pub fn name(&self) -> &str {
        entry_name(self.path())
    }

    pub fn created_at(&self) -> i64 {
        match self {
            Entry::File(f) => f.created_at,
            Entry::Directory(d) => d.created_at,
            Entry::Symlink(l) => l.created_at,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::File(_) => EntryKind::File,
            Entry::Directory(_) => EntryKind::Directory,
            Entry::Symlink(_) => EntryKind::Symlink,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, Entry::Symlink(_))
    }

    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Entry::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_dir(&self) -> Option<&DirectoryEntry> {
        match self {
            Entry::Directory(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_symlink(&self) -> Option<&SymlinkEntry> {
        match self {
            Entry::Symlink(l) => Some(l),
            _ => None,
        }
    }

    /// The same record at a new location; the parent derives from the
    /// new path. Timestamps and content metadata are preserved.
    pub fn relocated(&self, new_path: &str) -> Entry {
        let parent = parent_path(new_path);
        match self {
            Entry::File(f) => Entry::File(FileEntry {
                path: new_path.to_string(),
                parent,
                ..f.clone()
            }),
            Entry::Directory(d) => Entry::Directory(DirectoryEntry {
                path: new_path.to_string(),
                parent,
                ..d.clone()
            }),
            Entry::Symlink(l) => Entry::Symlink(SymlinkEntry {
                path: new_path.to_string(),
                parent,
                ..l.clone()
            }),
        }
    }
}

/// Current wall-clock time in unix milliseconds.
pub(crate) fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
