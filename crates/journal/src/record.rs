//! Persisted record format: one committed batch per journal line.

use bytes::Bytes;
use deskfs::{Batch, BatchOp, Chunk, Entry};
use serde::{Deserialize, Serialize};

/// One committed batch. `seq` is monotonically increasing across the
/// journal; a snapshot written by compaction is an ordinary record that
/// happens to rebuild the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub seq: u64,
    pub ops: Vec<RecordOp>,
}

/// Serializable mirror of `deskfs::BatchOp`. Chunk payloads travel
/// hex-encoded so a record stays one line of valid JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RecordOp {
    PutEntry {
        entry: Entry,
    },
    DeleteEntry {
        path: String,
    },
    PutChunk {
        path: String,
        index: u32,
        #[serde(with = "hex_payload")]
        payload: Vec<u8>,
    },
    DeleteChunks {
        path: String,
    },
}

impl From<BatchOp> for RecordOp {
    fn from(op: BatchOp) -> Self {
        match op {
            BatchOp::PutEntry(entry) => RecordOp::PutEntry { entry },
            BatchOp::DeleteEntry(path) => RecordOp::DeleteEntry { path },
            BatchOp::PutChunk(chunk) => RecordOp::PutChunk {
                path: chunk.path,
                index: chunk.index,
                payload: chunk.payload.to_vec(),
            },
            BatchOp::DeleteChunks(path) => RecordOp::DeleteChunks { path },
        }
    }
}

impl From<RecordOp> for BatchOp {
    fn from(op: RecordOp) -> Self {
        match op {
            RecordOp::PutEntry { entry } => BatchOp::PutEntry(entry),
            RecordOp::DeleteEntry { path } => BatchOp::DeleteEntry(path),
            RecordOp::PutChunk {
                path,
                index,
                payload,
            } => BatchOp::PutChunk(Chunk {
                path,
                index,
                payload: Bytes::from(payload),
            }),
            RecordOp::DeleteChunks { path } => BatchOp::DeleteChunks(path),
        }
    }
}

impl Record {
    pub fn from_batch(seq: u64, batch: &Batch) -> Self {
        Record {
            seq,
            ops: batch.ops().iter().cloned().map(RecordOp::from).collect(),
        }
    }

    pub fn into_batch(self) -> Batch {
        self.ops.into_iter().map(BatchOp::from).collect()
    }
}

mod hex_payload {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(payload: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(payload))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(&text).map_err(serde::de::Error::custom)
    }
}
