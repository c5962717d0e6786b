//! Chunk codec: converts heterogeneous content sources into an ordered
//! sequence of bounded-size byte chunks, and back.

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::error::Result;

/// Default chunk payload bound: 256 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// One stored fragment of a file's content, ordered by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub path: String,
    pub index: u32,
    pub payload: Bytes,
}

/// A content source accepted by `write_file`.
///
/// Fixed buffers and text are sliced in place; streams are consumed
/// incrementally and re-sliced across item boundaries.
pub enum Content {
    Bytes(Bytes),
    Text(String),
    Stream(BoxStream<'static, Result<Bytes>>),
}

impl Content {
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: futures::Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Content::Stream(Box::pin(stream))
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&[u8]> for Content {
    fn from(bytes: &[u8]) -> Self {
        Content::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for Content {
    fn from(bytes: Bytes) -> Self {
        Content::Bytes(bytes)
    }
}

impl std::fmt::Debug for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Bytes(b) => write!(f, "Content::Bytes({} bytes)", b.len()),
            Content::Text(t) => write!(f, "Content::Text({} chars)", t.len()),
            Content::Stream(_) => write!(f, "Content::Stream"),
        }
    }
}

/// Converts a content source into ordered chunks of at most
/// `chunk_size` bytes. Every produced chunk except possibly the last is
/// exactly `chunk_size` bytes; empty content produces no chunks.
pub async fn to_chunks(content: Content, chunk_size: usize) -> Result<Vec<Bytes>> {
    let chunk_size = chunk_size.max(1);
    match content {
        Content::Text(text) => Ok(slice_buffer(Bytes::from(text), chunk_size)),
        Content::Bytes(bytes) => Ok(slice_buffer(bytes, chunk_size)),
        Content::Stream(mut stream) => {
            let mut chunks = Vec::new();
            let mut pending = BytesMut::new();
            while let Some(item) = stream.next().await {
                pending.extend_from_slice(&item?);
                while pending.len() >= chunk_size {
                    chunks.push(pending.split_to(chunk_size).freeze());
                }
            }
            if !pending.is_empty() {
                chunks.push(pending.freeze());
            }
            Ok(chunks)
        }
    }
}

/// Reassembles chunk payloads in order: one allocation, ordered copy.
pub fn concat(chunks: &[Bytes]) -> Bytes {
    let total: usize = chunks.iter().map(|c| c.len()).sum();
    let mut buf = BytesMut::with_capacity(total);
    for chunk in chunks {
        buf.extend_from_slice(chunk);
    }
    buf.freeze()
}

fn slice_buffer(bytes: Bytes, chunk_size: usize) -> Vec<Bytes> {
    let mut out = Vec::with_capacity(bytes.len().div_ceil(chunk_size));
    let mut offset = 0;
    while offset < bytes.len() {
        let end = usize::min(offset + chunk_size, bytes.len());
        out.push(bytes.slice(offset..end));
        offset = end;
    }
    out
}
