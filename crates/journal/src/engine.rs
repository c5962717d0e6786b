// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use deskfs::{Batch, Chunk, Entry, MemoryEngine, StorageEngine};
use diagnostics::{log_info, log_warn};

use crate::error::{JournalError, Result};
use crate::record::{Record, RecordOp};

const JOURNAL_FILE: &str = "fs.journal";

struct LogWriter {
    file: File,
    next_seq: u64,
    path: PathBuf,
}

/// Append-only journal engine.
///
/// Reads come from the replayed in-memory tables. On `apply`, the
/// record line is appended and flushed before memory mutates, so the
/// journal is never behind the served state. The writer lock serializes
/// commits; there is still no cross-operation locking above this layer.
pub struct JournalEngine {
    state: MemoryEngine,
    writer: Arc<Mutex<LogWriter>>,
}

impl std::fmt::Debug for JournalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalEngine").finish_non_exhaustive()
    }
}

impl JournalEngine {
    /// Opens (creating if necessary) the journal under `dir` and
    /// replays every committed record. A torn trailing line — a crash
    /// mid-append — is discarded; corruption anywhere earlier is an
    /// error.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let journal_path = dir.join(JOURNAL_FILE);

        let state = MemoryEngine::new();
        let mut next_seq = 0u64;
        let mut replayed = 0usize;
        match tokio::fs::read_to_string(&journal_path).await {
            Ok(text) => {
                let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
                for (lineno, line) in lines.iter().enumerate() {
                    match serde_json::from_str::<Record>(line) {
                        Ok(record) => {
                            next_seq = record.seq + 1;
                            state.apply(record.into_batch()).await?;
                            replayed += 1;
                        }
                        Err(_) if lineno == lines.len() - 1 => {
                            log_warn!("discarding torn trailing journal record at line {line}",
                                line: lineno + 1);
                            break;
                        }
                        Err(_) => {
                            return Err(JournalError::Corrupt {
                                path: journal_path,
                                line: lineno + 1,
                            });
                        }
                    }
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        log_info!("journal opened with {count} records", count: replayed);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&journal_path)
            .await?;
        Ok(Self {
            state,
            writer: Arc::new(Mutex::new(LogWriter {
                file,
                next_seq,
                path: journal_path,
            })),
        })
    }

    /// Rewrites the journal as one snapshot record, truncating history.
    /// The snapshot replays into exactly the current tables.
    pub async fn compact(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        let (entries, chunks) = self.state.snapshot().await;
        let mut ops: Vec<RecordOp> = Vec::with_capacity(entries.len() + chunks.len());
        for entry in entries {
            ops.push(RecordOp::PutEntry { entry });
        }
        for chunk in chunks {
            ops.push(RecordOp::PutChunk {
                path: chunk.path,
                index: chunk.index,
                payload: chunk.payload.to_vec(),
            });
        }
        let count = ops.len();
        let record = Record {
            seq: writer.next_seq,
            ops,
        };
        writer.next_seq += 1;

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        let tmp_path = writer.path.with_file_name(format!("{}.tmp", JOURNAL_FILE));
        tokio::fs::write(&tmp_path, line.as_bytes()).await?;
        tokio::fs::rename(&tmp_path, &writer.path).await?;
        writer.file = OpenOptions::new().append(true).open(&writer.path).await?;
        log_info!("journal compacted to one snapshot of {count} ops", count: count);
        Ok(())
    }
}

#[async_trait]
impl StorageEngine for JournalEngine {
    async fn get(&self, path: &str) -> deskfs::Result<Option<Entry>> {
        self.state.get(path).await
    }

    async fn children_of(&self, parent: &str) -> deskfs::Result<Vec<Entry>> {
        self.state.children_of(parent).await
    }

    async fn symlinks(&self) -> deskfs::Result<Vec<Entry>> {
        self.state.symlinks().await
    }

    async fn chunks_of(&self, path: &str) -> deskfs::Result<Vec<Chunk>> {
        self.state.chunks_of(path).await
    }

    async fn chunk(&self, path: &str, index: u32) -> deskfs::Result<Option<Chunk>> {
        self.state.chunk(path, index).await
    }

    async fn apply(&self, batch: Batch) -> deskfs::Result<()> {
        let mut writer = self.writer.lock().await;
        let record = Record::from_batch(writer.next_seq, &batch);
        let mut line = serde_json::to_string(&record).map_err(JournalError::from)?;
        line.push('\n');
        writer
            .file
            .write_all(line.as_bytes())
            .await
            .map_err(JournalError::from)?;
        writer.file.flush().await.map_err(JournalError::from)?;
        writer.next_seq += 1;
        // Memory mutates only after the record is durable; the lock is
        // held so journal order equals table order.
        self.state.apply(batch).await
    }
}
