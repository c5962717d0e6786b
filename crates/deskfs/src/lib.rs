//! deskfs: the persistent virtual filesystem underlying a simulated
//! desktop environment.
//!
//! Every user-visible surface (desktop icons, the file browser, program
//! installation, editors, shell commands) ultimately calls into this
//! layer. It provides path canonicalization, a three-variant entry
//! model, chunked content storage with reconstruct-on-read, atomic
//! multi-record mutations, bounded symlink resolution, and per-path
//! change notification.
//!
//! Storage is pluggable through [`StorageEngine`]: [`MemoryEngine`]
//! backs tests, the `journal` crate provides the durable engine.

pub mod chunk;
pub mod entry;
pub mod error;
pub mod fs;
pub mod memory;
pub mod notify;
pub mod ops;
pub mod path;
pub mod resolve;
pub mod store;

#[cfg(test)]
mod tests;

pub use chunk::{concat, to_chunks, Chunk, Content, DEFAULT_CHUNK_SIZE};
pub use entry::{DirectoryEntry, Entry, EntryKind, FileEntry, SymlinkEntry};
pub use error::{Error, Result};
pub use fs::{Vfs, DEFAULT_DIRS};
pub use memory::MemoryEngine;
pub use notify::{ChangeBus, ChangeCallback, Subscription};
pub use ops::{CopyOptions, MoveOptions, WriteOptions};
pub use resolve::{resolve_fully, resolve_single, Resolved, MAX_LINK_DEPTH};
pub use store::{Batch, BatchOp, StorageEngine};
