// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory storage engine: the reference `StorageEngine`
//! implementation, used directly by tests and as the working state of
//! the durable journal engine.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::chunk::Chunk;
use crate::entry::Entry;
use crate::error::Result;
use crate::store::{Batch, BatchOp, StorageEngine};

#[derive(Default)]
struct Tables {
    entries: BTreeMap<String, Entry>,
    // parent path -> child paths; child paths under one parent sort by name
    by_parent: HashMap<String, BTreeSet<String>>,
    chunks: BTreeMap<(String, u32), Chunk>,
}

impl Tables {
    fn apply_op(&mut self, op: BatchOp) {
        match op {
            BatchOp::PutEntry(entry) => {
                let path = entry.path().to_string();
                if let Some(prev) = self.entries.get(&path) {
                    let prev_parent = prev.parent().to_string();
                    self.unindex(&prev_parent, &path);
                }
                self.by_parent
                    .entry(entry.parent().to_string())
                    .or_default()
                    .insert(path.clone());
                self.entries.insert(path, entry);
            }
            BatchOp::DeleteEntry(path) => {
                if let Some(prev) = self.entries.remove(&path) {
                    let prev_parent = prev.parent().to_string();
                    self.unindex(&prev_parent, &path);
                }
            }
            BatchOp::PutChunk(chunk) => {
                self.chunks
                    .insert((chunk.path.clone(), chunk.index), chunk);
            }
            BatchOp::DeleteChunks(path) => {
                let keys: Vec<(String, u32)> = self
                    .chunks
                    .range((path.clone(), 0)..=(path.clone(), u32::MAX))
                    .map(|(key, _)| key.clone())
                    .collect();
                for key in keys {
                    self.chunks.remove(&key);
                }
            }
        }
    }

    fn unindex(&mut self, parent: &str, path: &str) {
        if let Some(children) = self.by_parent.get_mut(parent) {
            children.remove(path);
            if children.is_empty() {
                self.by_parent.remove(parent);
            }
        }
    }
}

/// Two BTree tables plus a parent-path secondary index, all behind one
/// async mutex so a batch applies atomically.
#[derive(Clone, Default)]
pub struct MemoryEngine {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A full copy of both tables, entries then chunks, in key order.
    /// Used by durable engines to write snapshot records.
    pub async fn snapshot(&self) -> (Vec<Entry>, Vec<Chunk>) {
        let tables = self.tables.lock().await;
        (
            tables.entries.values().cloned().collect(),
            tables.chunks.values().cloned().collect(),
        )
    }
}

#[async_trait]
impl StorageEngine for MemoryEngine {
    async fn get(&self, path: &str) -> Result<Option<Entry>> {
        let tables = self.tables.lock().await;
        Ok(tables.entries.get(path).cloned())
    }

    async fn children_of(&self, parent: &str) -> Result<Vec<Entry>> {
        let tables = self.tables.lock().await;
        let Some(children) = tables.by_parent.get(parent) else {
            return Ok(Vec::new());
        };
        Ok(children
            .iter()
            .filter_map(|path| tables.entries.get(path).cloned())
            .collect())
    }

    async fn symlinks(&self) -> Result<Vec<Entry>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .entries
            .values()
            .filter(|entry| entry.is_symlink())
            .cloned()
            .collect())
    }

    async fn chunks_of(&self, path: &str) -> Result<Vec<Chunk>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .chunks
            .range((path.to_string(), 0)..=(path.to_string(), u32::MAX))
            .map(|(_, chunk)| chunk.clone())
            .collect())
    }

    async fn chunk(&self, path: &str, index: u32) -> Result<Option<Chunk>> {
        let tables = self.tables.lock().await;
        Ok(tables.chunks.get(&(path.to_string(), index)).cloned())
    }

    async fn apply(&self, batch: Batch) -> Result<()> {
        let mut tables = self.tables.lock().await;
        for op in batch.into_ops() {
            tables.apply_op(op);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::DirectoryEntry;
    use bytes::Bytes;

    fn dir(path: &str) -> Entry {
        Entry::Directory(DirectoryEntry {
            path: path.to_string(),
            parent: crate::path::parent_path(path),
            created_at: 0,
        })
    }

    #[tokio::test]
    async fn test_children_index_sorted() {
        let engine = MemoryEngine::new();
        let mut batch = Batch::new();
        batch.put_entry(dir("/b"));
        batch.put_entry(dir("/a"));
        batch.put_entry(dir("/a/inner"));
        engine.apply(batch).await.unwrap();

        let names: Vec<String> = engine
            .children_of("/")
            .await
            .unwrap()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_prunes_index() {
        let engine = MemoryEngine::new();
        let mut batch = Batch::new();
        batch.put_entry(dir("/a"));
        engine.apply(batch).await.unwrap();

        let mut batch = Batch::new();
        batch.delete_entry("/a");
        engine.apply(batch).await.unwrap();

        assert!(engine.children_of("/").await.unwrap().is_empty());
        assert!(engine.get("/a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chunk_range_ops() {
        let engine = MemoryEngine::new();
        let mut batch = Batch::new();
        for index in 0..3u32 {
            batch.put_chunk(Chunk {
                path: "/f".to_string(),
                index,
                payload: Bytes::from(vec![index as u8]),
            });
        }
        batch.put_chunk(Chunk {
            path: "/g".to_string(),
            index: 0,
            payload: Bytes::from_static(b"x"),
        });
        engine.apply(batch).await.unwrap();

        let indices: Vec<u32> = engine
            .chunks_of("/f")
            .await
            .unwrap()
            .iter()
            .map(|c| c.index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let mut batch = Batch::new();
        batch.delete_chunks("/f");
        engine.apply(batch).await.unwrap();
        assert!(engine.chunks_of("/f").await.unwrap().is_empty());
        assert_eq!(engine.chunks_of("/g").await.unwrap().len(), 1);
    }
}
