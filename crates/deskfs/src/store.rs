//! The storage seam: two durable tables (entries keyed by path with a
//! parent-path secondary index, chunks keyed by path and index) behind
//! an asynchronous engine that commits one ordered write set at a time.

use async_trait::async_trait;

use crate::chunk::Chunk;
use crate::entry::Entry;
use crate::error::Result;

/// One write in a transactional batch.
#[derive(Debug, Clone)]
pub enum BatchOp {
    PutEntry(Entry),
    DeleteEntry(String),
    PutChunk(Chunk),
    /// Drops every chunk stored for the path.
    DeleteChunks(String),
}

/// An ordered write set applied atomically by the engine.
///
/// Every logical mutation assembles its whole write set first, so a
/// single `apply` is the transaction: metadata and chunk writes for one
/// operation commit or fail together. Ops are applied in insertion
/// order; later ops observe earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_entry(&mut self, entry: Entry) -> &mut Self {
        self.ops.push(BatchOp::PutEntry(entry));
        self
    }

    pub fn delete_entry(&mut self, path: impl Into<String>) -> &mut Self {
        self.ops.push(BatchOp::DeleteEntry(path.into()));
        self
    }

    pub fn put_chunk(&mut self, chunk: Chunk) -> &mut Self {
        self.ops.push(BatchOp::PutChunk(chunk));
        self
    }

    pub fn delete_chunks(&mut self, path: impl Into<String>) -> &mut Self {
        self.ops.push(BatchOp::DeleteChunks(path.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

impl FromIterator<BatchOp> for Batch {
    fn from_iter<T: IntoIterator<Item = BatchOp>>(iter: T) -> Self {
        Batch {
            ops: iter.into_iter().collect(),
        }
    }
}

/// Asynchronous access to the entry and chunk tables.
///
/// Reads are point lookups and index scans; all writes go through
/// `apply`, which commits a whole batch or nothing. The engine provides
/// no cross-call locking: two concurrent batches touching the same
/// records race at the record level and the last write wins.
#[async_trait]
pub trait StorageEngine: Send + Sync {
    /// Point lookup by canonical path.
    async fn get(&self, path: &str) -> Result<Option<Entry>>;

    /// All entries whose parent is `parent`, sorted by name.
    async fn children_of(&self, parent: &str) -> Result<Vec<Entry>>;

    /// Every symlink record in the store. Drives reverse fan-out and
    /// retargeting after rename/move.
    async fn symlinks(&self) -> Result<Vec<Entry>>;

    /// All chunks stored for `path`, sorted by index.
    async fn chunks_of(&self, path: &str) -> Result<Vec<Chunk>>;

    /// One chunk by key, for pull-based readers.
    async fn chunk(&self, path: &str, index: u32) -> Result<Option<Chunk>>;

    /// Atomically applies the batch, in order.
    async fn apply(&self, batch: Batch) -> Result<()>;
}
