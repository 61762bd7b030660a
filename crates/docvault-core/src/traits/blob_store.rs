//! Blob store trait for pluggable binary content backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};

use crate::result::AppResult;
use crate::types::BlobId;

/// A byte stream type used for reading and writing blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Descriptive metadata recorded alongside a blob when it is written.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BlobMetadata {
    /// Workspace the content was uploaded into.
    pub workspace_id: Option<String>,
    /// Owner key of the uploader.
    pub owner_key: Option<String>,
    /// Document type label (`pdf`, `image`, ...).
    pub doc_type: Option<String>,
    /// MIME type, if known.
    pub mime_type: Option<String>,
}

/// Streamed binary storage addressed by opaque handles.
///
/// `write` resolving to `Ok` is the completion signal; until then no
/// handle exists and callers must not record one.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Stream content into the store under `name` and return its handle.
    async fn write(&self, name: &str, metadata: BlobMetadata, stream: ByteStream)
    -> AppResult<BlobId>;

    /// Open a blob for reading.
    async fn read(&self, id: &BlobId) -> AppResult<ByteStream>;

    /// Delete a blob.
    async fn delete(&self, id: &BlobId) -> AppResult<()>;

    /// Read a blob fully into memory.
    async fn read_bytes(&self, id: &BlobId) -> AppResult<Bytes> {
        let chunks: Vec<Bytes> = self.read(id).await?.try_collect().await?;
        Ok(Bytes::from(chunks.concat()))
    }
}

/// Wrap an in-memory payload as a single-chunk [`ByteStream`].
pub fn bytes_stream(data: Bytes) -> ByteStream {
    Box::pin(futures::stream::once(async move { Ok(data) }))
}
