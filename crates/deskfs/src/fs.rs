// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The filesystem façade: an engine, a notification bus, and a memoized
//! bootstrap. Mutation operations live in `ops`.

use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::Stream;
use tokio::sync::OnceCell;

use crate::chunk;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::notify::{ChangeBus, Subscription};
use crate::path::normalize;
use crate::resolve::{resolve_fully, Resolved};
use crate::store::StorageEngine;
use diagnostics::log_info;

/// Top-level directories seeded by `init`.
pub const DEFAULT_DIRS: &[&str] = &[
    "/Programs",
    "/Desktop",
    "/Documents",
    "/Pictures",
    "/Music",
    "/Videos",
    "/Downloads",
];

/// The persistent virtual filesystem.
///
/// Cheap to clone; clones share the engine, the subscription registry,
/// and the bootstrap cell. All operations are async and may run
/// concurrently; each mutation commits as one atomic batch, but there
/// is no cross-operation locking (overlapping calls race at the record
/// level, last write wins).
#[derive(Clone)]
pub struct Vfs {
    pub(crate) engine: Arc<dyn StorageEngine>,
    pub(crate) bus: Arc<ChangeBus>,
    init: Arc<OnceCell<()>>,
}

impl Vfs {
    pub fn new<E: StorageEngine + 'static>(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
            bus: Arc::new(ChangeBus::new()),
            init: Arc::new(OnceCell::new()),
        }
    }

    /// Seeds the fixed top-level directories. Idempotent; concurrent
    /// callers await the same in-flight initialization.
    pub async fn init(&self) -> Result<()> {
        self.init
            .get_or_try_init(|| async {
                for dir in DEFAULT_DIRS {
                    self.ensure_dir_exists(dir, true).await?;
                }
                log_info!("filesystem initialized");
                Ok::<(), Error>(())
            })
            .await?;
        Ok(())
    }

    /// Entry metadata after full symlink resolution. Absent paths and
    /// broken links report `None`.
    pub async fn stat(&self, path: &str) -> Result<Option<Entry>> {
        let path = normalize(path);
        Ok(resolve_fully(self.engine.as_ref(), &path).await?.entry)
    }

    /// Entry metadata with no resolution at all.
    pub async fn lstat(&self, path: &str) -> Result<Option<Entry>> {
        self.engine.get(&normalize(path)).await
    }

    pub async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.stat(path).await?.is_some())
    }

    pub async fn lexists(&self, path: &str) -> Result<bool> {
        Ok(self.lstat(path).await?.is_some())
    }

    /// A symlink's stored target. `None` for a missing path; a non-link
    /// entry is a mismatch and raises.
    pub async fn read_link(&self, path: &str) -> Result<Option<String>> {
        let path = normalize(path);
        match self.engine.get(&path).await? {
            None => Ok(None),
            Some(Entry::Symlink(link)) => Ok(Some(link.target)),
            Some(_) => Err(Error::not_a_symlink(&path)),
        }
    }

    /// Directory listing, sorted by name. The directory argument is
    /// resolved through symlinks. Root always lists, record or not.
    pub async fn list(&self, path: &str) -> Result<Vec<Entry>> {
        let path = normalize(path);
        let resolved = resolve_fully(self.engine.as_ref(), &path).await?;
        match resolved.entry {
            Some(Entry::Directory(_)) => self.engine.children_of(&resolved.path).await,
            None if resolved.path == "/" => self.engine.children_of("/").await,
            None => Err(Error::not_found(&path)),
            Some(_) => Err(Error::not_a_directory(&path)),
        }
    }

    /// Whole-file read: loads every chunk and concatenates. `None` when
    /// nothing exists at the resolved path.
    pub async fn read_file(&self, path: &str) -> Result<Option<Bytes>> {
        let path = normalize(path);
        let resolved = resolve_fully(self.engine.as_ref(), &path).await?;
        match resolved.entry {
            None => Ok(None),
            Some(Entry::File(_)) => {
                let chunks = self.engine.chunks_of(&resolved.path).await?;
                let payloads: Vec<Bytes> = chunks.into_iter().map(|c| c.payload).collect();
                Ok(Some(chunk::concat(&payloads)))
            }
            Some(_) => Err(Error::not_a_file(&path)),
        }
    }

    /// Whole-file read decoded as UTF-8 text.
    pub async fn read_file_text(&self, path: &str) -> Result<Option<String>> {
        match self.read_file(path).await? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| Error::utf8(normalize(path))),
        }
    }

    /// Pull-based content reader: fetches one stored chunk per poll and
    /// completes when the file's indices are exhausted. Unlike
    /// `read_file`, a missing path raises here.
    pub async fn read_file_stream(
        &self,
        path: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>> {
        let path = normalize(path);
        let resolved = resolve_fully(self.engine.as_ref(), &path).await?;
        let file = match resolved.entry {
            None => return Err(Error::not_found(&path)),
            Some(Entry::File(file)) => file,
            Some(_) => return Err(Error::not_a_file(&path)),
        };
        let engine = self.engine.clone();
        let stream = async_stream::try_stream! {
            for index in 0..file.chunk_count {
                let chunk = engine.chunk(&file.path, index).await?.ok_or_else(|| {
                    Error::storage(format!("missing chunk {} of {}", index, file.path))
                })?;
                yield chunk.payload;
            }
        };
        Ok(Box::pin(stream))
    }

    /// Registers a callback for mutations relevant to `path`: the path
    /// itself, anything it resolves to or from, or its children (via
    /// the parent key in the fan-out).
    pub fn subscribe<F>(&self, path: &str, callback: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.bus.clone().subscribe(&normalize(path), Arc::new(callback))
    }

    /// Drops every subscription on this filesystem.
    pub fn clear_subscriptions(&self) {
        self.bus.clear();
    }

    pub(crate) async fn resolve(&self, path: &str) -> Result<Resolved> {
        resolve_fully(self.engine.as_ref(), path).await
    }
}

impl std::fmt::Debug for Vfs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vfs{{}}")
    }
}
