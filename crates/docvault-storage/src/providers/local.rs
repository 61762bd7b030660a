//! Local filesystem blob store.

use std::path::PathBuf;

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::{BlobMetadata, BlobStore, ByteStream};
use docvault_core::types::BlobId;

use super::blob_key;

const PARTIAL_SUFFIX: &str = ".partial";
const META_SUFFIX: &str = ".meta.json";

/// Stores each blob as one file under a root directory, with its
/// [`BlobMetadata`] in a JSON sidecar.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a handle to a file inside the root. Handles are single path
    /// segments; anything else is rejected.
    fn resolve(&self, id: &BlobId) -> AppResult<PathBuf> {
        let key = id.as_str();
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(AppError::not_found(format!("Blob not found: {key}")));
        }
        Ok(self.root.join(key))
    }

    fn sidecar(path: &std::path::Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(META_SUFFIX);
        PathBuf::from(name)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn write(
        &self,
        name: &str,
        metadata: BlobMetadata,
        mut stream: ByteStream,
    ) -> AppResult<BlobId> {
        let id = BlobId::new(blob_key(name));
        let final_path = self.resolve(&id)?;
        let mut partial = final_path.as_os_str().to_os_string();
        partial.push(PARTIAL_SUFFIX);
        let partial_path = PathBuf::from(partial);

        let mut file = fs::File::create(&partial_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to create blob: {id}"), e)
        })?;

        let mut total_bytes = 0u64;
        let copied: AppResult<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Upload stream read error", e)
                })?;
                total_bytes += chunk.len() as u64;
                file.write_all(&chunk).await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to write blob chunk", e)
                })?;
            }
            file.flush()
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush blob", e))
        }
        .await;

        if let Err(e) = copied {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&partial_path).await {
                warn!(blob = %id, error = %cleanup, "Failed to remove partial blob");
            }
            return Err(e);
        }
        drop(file);

        let sidecar = serde_json::to_vec(&metadata)?;
        fs::write(Self::sidecar(&final_path), sidecar)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write blob metadata", e)
            })?;
        fs::rename(&partial_path, &final_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to commit blob: {id}"), e)
        })?;

        debug!(blob = %id, bytes = total_bytes, "Wrote blob");
        Ok(id)
    }

    async fn read(&self, id: &BlobId) -> AppResult<ByteStream> {
        let path = self.resolve(id)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {id}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open blob: {id}"), e)
            }
        })?;

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn delete(&self, id: &BlobId) -> AppResult<()> {
        let path = self.resolve(id)?;
        for target in [Self::sidecar(&path), path] {
            match fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to delete blob: {id}"),
                        e,
                    ));
                }
            }
        }
        debug!(blob = %id, "Deleted blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use docvault_core::traits::bytes_stream;

    async fn store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_write_then_read_bytes() {
        let (_dir, store) = store().await;
        let id = store
            .write(
                "report.pdf",
                BlobMetadata::default(),
                bytes_stream(Bytes::from_static(b"%PDF-1.7")),
            )
            .await
            .unwrap();

        assert!(id.as_str().ends_with("-report.pdf"));
        let data = store.read_bytes(&id).await.unwrap();
        assert_eq!(&data[..], b"%PDF-1.7");
        assert!(store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_write_accepts_longest_valid_name() {
        let (_dir, store) = store().await;
        let name = format!("{}.pdf", "a".repeat(251));
        let id = store
            .write(
                &name,
                BlobMetadata::default(),
                bytes_stream(Bytes::from_static(b"%PDF-1.7")),
            )
            .await
            .unwrap();

        assert!(id.as_str().ends_with(".pdf"));
        let data = store.read_bytes(&id).await.unwrap();
        assert_eq!(&data[..], b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_no_blob() {
        let (dir, store) = store().await;
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("connection reset")),
        ];
        let stream: ByteStream = Box::pin(futures::stream::iter(chunks));

        let err = store
            .write("broken.bin", BlobMetadata::default(), stream)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Storage));

        let mut entries = std::fs::read_dir(dir.path()).unwrap();
        assert!(entries.next().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_read_after_delete_is_not_found() {
        let (_dir, store) = store().await;
        let id = store
            .write(
                "a.txt",
                BlobMetadata::default(),
                bytes_stream(Bytes::from_static(b"a")),
            )
            .await
            .unwrap();

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        let err = store.read(&id).await.err().unwrap();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_handles_with_separators_are_rejected() {
        let (_dir, store) = store().await;
        let err = store.read(&BlobId::new("../outside")).await.err().unwrap();
        assert!(err.is(ErrorKind::NotFound));
    }
}
