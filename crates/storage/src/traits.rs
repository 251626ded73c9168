//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use std::pin::Pin;

/// A boxed stream of bytes for streaming transfers.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// A byte stream paired with its declared length.
///
/// Backends that must know the object size up front (S3 `Content-Length`)
/// read the declared length; the bytes themselves are consumed incrementally
/// so a transfer never materializes the full payload in memory. Cancelling
/// the source stream (e.g. a client disconnect) surfaces as a stream error
/// and aborts the in-flight backend call.
pub struct Payload {
    len: u64,
    stream: ByteStream,
}

impl Payload {
    /// Create a payload from a stream with a declared length in bytes.
    pub fn new(len: u64, stream: ByteStream) -> Self {
        Self { len, stream }
    }

    /// Create a payload from an in-memory buffer.
    pub fn from_bytes(data: Bytes) -> Self {
        let len = data.len() as u64;
        Self {
            len,
            stream: Box::pin(futures::stream::once(async move { Ok(data) })),
        }
    }

    /// Create a zero-length payload, e.g. for marker objects.
    pub fn empty() -> Self {
        Self {
            len: 0,
            stream: Box::pin(futures::stream::empty()),
        }
    }

    /// Declared length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the declared length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Consume the payload, returning the underlying stream.
    pub fn into_stream(self) -> ByteStream {
        self.stream
    }

    /// Drain the payload into a single buffer.
    ///
    /// Only suitable for small objects and tests; production transfers go
    /// through [`ObjectStore::put`] without buffering.
    pub async fn collect(self) -> StorageResult<Bytes> {
        let chunks: Vec<Bytes> = self.stream.try_collect().await?;
        Ok(chunks.concat().into())
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload").field("len", &self.len).finish()
    }
}

/// Minimal object store capability interface.
///
/// The upload session protocol is built entirely from these primitives, so
/// it can be unit-tested against an in-memory fake. All operations are
/// idempotent: `put` overwrites, `delete` of a missing key is `NotFound`,
/// `list` is read-only. The protocol additionally assumes read-after-write
/// and list consistency within a single key prefix; on a backend without
/// that, the session open race defense is unsound.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// List object keys starting with a prefix, recursively.
    ///
    /// Callers terminate directory-style prefixes with `/`. Keys are
    /// returned relative to the store root.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Get an object's content.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put an object, streaming the payload. Overwrites an existing object.
    async fn put(&self, key: &str, payload: Payload) -> StorageResult<()>;

    /// Delete an object.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Get the name of this storage backend, for logging.
    fn backend_name(&self) -> &'static str;

    /// Verify storage backend connectivity.
    ///
    /// Called during server startup so misconfiguration is caught before
    /// requests are accepted. The default implementation returns Ok(()),
    /// suitable for backends without a connectivity concern.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
