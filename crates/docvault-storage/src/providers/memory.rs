//! In-memory blob store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::TryStreamExt;
use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{BlobMetadata, BlobStore, ByteStream, bytes_stream};
use docvault_core::types::BlobId;

use super::blob_key;

/// Holds blobs in a concurrent map. Content is lost when the store drops.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<BlobId, (BlobMetadata, Bytes)>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a blob with this handle is stored.
    pub fn contains(&self, id: &BlobId) -> bool {
        self.blobs.contains_key(id)
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Metadata recorded for a blob.
    pub fn metadata(&self, id: &BlobId) -> Option<BlobMetadata> {
        self.blobs.get(id).map(|entry| entry.0.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write(
        &self,
        name: &str,
        metadata: BlobMetadata,
        stream: ByteStream,
    ) -> AppResult<BlobId> {
        let chunks: Vec<Bytes> = stream.try_collect().await.map_err(|e| {
            AppError::with_source(
                docvault_core::ErrorKind::Storage,
                "Upload stream read error",
                e,
            )
        })?;
        let data = Bytes::from(chunks.concat());
        let id = BlobId::new(blob_key(name));
        debug!(blob = %id, bytes = data.len(), "Stored blob in memory");
        self.blobs.insert(id.clone(), (metadata, data));
        Ok(id)
    }

    async fn read(&self, id: &BlobId) -> AppResult<ByteStream> {
        self.blobs
            .get(id)
            .map(|entry| bytes_stream(entry.1.clone()))
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {id}")))
    }

    async fn delete(&self, id: &BlobId) -> AppResult<()> {
        self.blobs.remove(id);
        Ok(())
    }
}
