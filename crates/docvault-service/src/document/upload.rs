//! Binary uploads with append-or-create version semantics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures::StreamExt;
use tracing::{info, warn};
use validator::Validate;

use docvault_core::config::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{BlobMetadata, ByteStream};
use docvault_core::types::{BlobId, FolderId, OwnerKey, WorkspaceId};
use docvault_entity::document::{Document, DocumentType};

use crate::context::RequestContext;
use crate::store::ContentStore;
use crate::validation::validate_name;

/// An uploaded file: its client-side name, MIME type and content stream.
pub struct UploadFile {
    /// Original file name.
    pub file_name: String,
    /// MIME type reported by the client.
    pub mime_type: Option<String>,
    /// File content.
    pub stream: ByteStream,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

/// Request to upload binary content into a workspace.
#[derive(Debug, Validate)]
pub struct UploadRequest {
    /// Target workspace.
    pub workspace_id: WorkspaceId,
    /// Target folder, if any.
    pub folder_id: Option<FolderId>,
    /// Content category.
    pub doc_type: DocumentType,
    /// Document name; defaults to the uploaded file name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Note recorded on the ledger entry when this upload replaces content.
    pub change_note: Option<String>,
    /// The uploaded file.
    pub file: UploadFile,
}

/// Streams uploads into the blob store and records them as documents.
///
/// An upload whose `(workspace, folder, name)` matches a live document
/// becomes a new version of it; otherwise a new document is created.
#[derive(Debug, Clone)]
pub struct UploadService {
    store: ContentStore,
    max_upload_size: u64,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(store: ContentStore, storage: &StorageConfig) -> Self {
        Self {
            store,
            max_upload_size: storage.max_upload_size_bytes,
        }
    }

    /// Validates the destination, writes the blob, then appends or creates
    /// the document record. No record changes unless the blob write
    /// completes.
    pub async fn upload_and_save(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
    ) -> AppResult<Document> {
        req.validate()?;
        let name = req.name.unwrap_or_else(|| req.file.file_name.clone());
        validate_name("Document", &name)?;
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_workspace(&owner, req.workspace_id).await?;
        if let Some(folder_id) = req.folder_id {
            self.store
                .placement_folder(&owner, req.workspace_id, folder_id)
                .await?;
        }

        let metadata = BlobMetadata {
            workspace_id: Some(req.workspace_id.to_string()),
            owner_key: Some(owner.to_string()),
            doc_type: Some(req.doc_type.to_string()),
            mime_type: req.file.mime_type.clone(),
        };
        let (blob, size) = self
            .write_limited(&req.file.file_name, metadata, req.file.stream)
            .await?;

        let target = Placement {
            workspace_id: req.workspace_id,
            folder_id: req.folder_id,
            name,
            doc_type: req.doc_type,
        };
        let recorded = self
            .record(&owner, target, &blob, size, req.file.mime_type, req.change_note)
            .await;

        match recorded {
            Ok(document) => {
                info!(
                    owner = %owner,
                    document_id = %document.id,
                    version = document.version(),
                    bytes = size,
                    "Upload saved"
                );
                Ok(document)
            }
            Err(e) => {
                if let Err(cleanup) = self.store.blobs.delete(&blob).await {
                    warn!(blob = %blob, error = %cleanup, "Failed to delete blob of failed upload");
                }
                Err(e)
            }
        }
    }

    /// Stream into the blob store, failing once the payload exceeds the
    /// configured size limit. Returns the handle and the byte count.
    async fn write_limited(
        &self,
        file_name: &str,
        metadata: BlobMetadata,
        stream: ByteStream,
    ) -> AppResult<(BlobId, u64)> {
        let limit = self.max_upload_size;
        let total = Arc::new(AtomicU64::new(0));
        let exceeded = Arc::new(AtomicBool::new(false));

        let counted: ByteStream = {
            let total = Arc::clone(&total);
            let exceeded = Arc::clone(&exceeded);
            Box::pin(stream.map(move |chunk| {
                let chunk = chunk?;
                let seen = total.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
                if seen > limit {
                    exceeded.store(true, Ordering::Relaxed);
                    return Err(std::io::Error::other("upload exceeds the size limit"));
                }
                Ok(chunk)
            }))
        };

        match self.store.blobs.write(file_name, metadata, counted).await {
            Ok(blob) => Ok((blob, total.load(Ordering::Relaxed))),
            Err(_) if exceeded.load(Ordering::Relaxed) => Err(AppError::validation(format!(
                "Upload exceeds the maximum size of {limit} bytes"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Append the new blob to the matching live document, or create one.
    async fn record(
        &self,
        owner: &OwnerKey,
        target: Placement,
        blob: &BlobId,
        size: u64,
        mime_type: Option<String>,
        change_note: Option<String>,
    ) -> AppResult<Document> {
        let size = i64::try_from(size).unwrap_or(i64::MAX);
        let existing = self
            .store
            .documents
            .find_live_by_name(target.workspace_id, target.folder_id, &target.name)
            .await?;

        match existing {
            Some(mut document) => {
                if !document.is_owned_by(owner) {
                    return Err(AppError::forbidden(
                        "A document with this name belongs to another owner",
                    ));
                }
                let snapshot = document.snapshot(owner.clone(), change_note);
                document.replace_content(snapshot, Some(blob.clone()), size, mime_type);
                document.doc_type = target.doc_type;
                self.store.documents.update(&document).await
            }
            None => {
                let mut document = Document::new(
                    target.workspace_id,
                    target.folder_id,
                    owner.clone(),
                    target.name,
                    target.doc_type,
                );
                document.file_path = Some(blob.clone());
                document.metadata.size = size;
                document.metadata.mime_type = mime_type;
                self.store.documents.insert(&document).await
            }
        }
    }
}

struct Placement {
    workspace_id: WorkspaceId,
    folder_id: Option<FolderId>,
    name: String,
    doc_type: DocumentType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use docvault_core::error::ErrorKind;
    use docvault_core::traits::bytes_stream;

    use crate::testing::Fixture;

    fn request(workspace_id: WorkspaceId, folder_id: Option<FolderId>, data: &'static [u8]) -> UploadRequest {
        UploadRequest {
            workspace_id,
            folder_id,
            doc_type: DocumentType::Pdf,
            name: None,
            change_note: None,
            file: UploadFile {
                file_name: "report.pdf".to_string(),
                mime_type: Some("application/pdf".to_string()),
                stream: bytes_stream(Bytes::from_static(data)),
            },
        }
    }

    #[tokio::test]
    async fn test_reupload_appends_to_ledger() {
        let fx = Fixture::new();
        let svc = fx.upload_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;

        let first = svc
            .upload_and_save(&fx.ctx, request(ws.id, Some(docs.id), b"v1"))
            .await
            .unwrap();
        assert_eq!(first.version(), 1);
        assert_eq!(first.metadata.size, 2);
        let first_blob = first.file_path.clone().unwrap();

        let second = svc
            .upload_and_save(&fx.ctx, request(ws.id, Some(docs.id), b"v2-bytes"))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.version(), 2);
        assert_eq!(second.versions.len(), 1);
        assert_eq!(second.versions[0].file_path, Some(first_blob));
        assert_eq!(second.versions[0].version, 1);
        assert_eq!(second.metadata.size, 8);
        assert_eq!(fx.blobs.len(), 2);
    }

    #[tokio::test]
    async fn test_same_name_in_other_folder_creates_new_document() {
        let fx = Fixture::new();
        let svc = fx.upload_service();
        let ws = fx.workspace().await;
        let a = fx.folder(ws.id, None, "A").await;

        let filed = svc
            .upload_and_save(&fx.ctx, request(ws.id, Some(a.id), b"1"))
            .await
            .unwrap();
        let unfiled = svc
            .upload_and_save(&fx.ctx, request(ws.id, None, b"2"))
            .await
            .unwrap();
        assert_ne!(filed.id, unfiled.id);
        assert_eq!(unfiled.version(), 1);
    }

    #[tokio::test]
    async fn test_blob_failure_leaves_documents_untouched() {
        let fx = Fixture::new();
        let svc = fx.upload_service();
        let ws = fx.workspace().await;
        let first = svc
            .upload_and_save(&fx.ctx, request(ws.id, None, b"v1"))
            .await
            .unwrap();

        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Err(std::io::Error::other("client went away"))];
        let mut req = request(ws.id, None, b"");
        req.file.stream = Box::pin(futures::stream::iter(chunks));
        let err = svc.upload_and_save(&fx.ctx, req).await.unwrap_err();
        assert!(err.is(ErrorKind::Storage));

        let after = fx.store.documents.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(after.version(), 1);
        assert!(after.versions.is_empty());
        assert_eq!(fx.blobs.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_a_validation_error() {
        let fx = Fixture::with_upload_limit(4);
        let ws = fx.workspace().await;
        let err = fx
            .upload_service()
            .upload_and_save(&fx.ctx, request(ws.id, None, b"too large"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        assert!(fx.blobs.is_empty());
    }

    #[tokio::test]
    async fn test_upload_into_deleted_folder_writes_nothing() {
        let fx = Fixture::new();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        fx.folder_service().delete_folder(&fx.ctx, docs.id).await.unwrap();

        let err = fx
            .upload_service()
            .upload_and_save(&fx.ctx, request(ws.id, Some(docs.id), b"x"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidState));
        assert!(fx.blobs.is_empty());
    }
}
