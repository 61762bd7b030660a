//! Document version ledger: history, restore and pruning.

use tracing::info;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, DocumentVersionId};
use docvault_entity::SoftDelete;
use docvault_entity::document::{Document, DocumentVersion};

use crate::context::RequestContext;
use crate::store::ContentStore;

/// Reads and edits the per-document version ledger.
#[derive(Debug, Clone)]
pub struct VersionService {
    store: ContentStore,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    /// Lists a document's prior versions, most recent upload first.
    pub async fn get_document_versions(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<Vec<DocumentVersion>> {
        let owner = self.store.owner_of(ctx).await?;
        let document = self.store.owned_document(&owner, document_id).await?;

        let mut versions = document.versions;
        versions.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then(b.version.cmp(&a.version))
        });
        Ok(versions)
    }

    /// Makes a prior version current again. The current state is first
    /// appended to the ledger, so the restore itself is undoable.
    pub async fn restore_document_version(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        version_id: DocumentVersionId,
    ) -> AppResult<Document> {
        let owner = self.store.owner_of(ctx).await?;
        let mut document = self.store.owned_document(&owner, document_id).await?;
        document.ensure_live()?;

        let entry = document
            .find_version(version_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))?;

        let snapshot = document.snapshot(owner.clone(), None);
        document.replace_content(snapshot, entry.file_path, entry.size, entry.mime_type);
        let document = self.store.documents.update(&document).await?;

        info!(
            owner = %owner,
            document_id = %document.id,
            restored_version = entry.version,
            version = document.version(),
            "Document version restored"
        );
        Ok(document)
    }

    /// Removes the ledger entry at `index` (append order).
    pub async fn delete_document_version(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        index: i64,
    ) -> AppResult<Document> {
        let owner = self.store.owner_of(ctx).await?;
        let document = self.store.owned_document(&owner, document_id).await?;

        let len = document.versions.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|i| *i < len)
            .ok_or_else(|| {
                AppError::out_of_range(format!(
                    "Version index {index} is out of range for {len} entries"
                ))
            })?;
        self.remove_entry(document, position).await
    }

    /// Removes the ledger entry with the given ID.
    pub async fn delete_document_version_by_id(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        version_id: DocumentVersionId,
    ) -> AppResult<Document> {
        let owner = self.store.owner_of(ctx).await?;
        let document = self.store.owned_document(&owner, document_id).await?;

        let position = document
            .versions
            .iter()
            .position(|v| v.id == version_id)
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))?;
        self.remove_entry(document, position).await
    }

    /// Drop one entry and persist; its blob goes too once nothing else in the
    /// document refers to it.
    async fn remove_entry(&self, mut document: Document, position: usize) -> AppResult<Document> {
        let removed = document.versions.remove(position);
        document.updated_at = chrono::Utc::now();
        let document = self.store.documents.update(&document).await?;

        if let Some(blob) = &removed.file_path {
            if !document.references_blob(blob) {
                self.store.purge_blobs(std::slice::from_ref(blob)).await;
            }
        }

        info!(
            owner = %document.owner_key,
            document_id = %document.id,
            removed_version = removed.version,
            "Document version deleted"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;

    use crate::testing::Fixture;

    async fn three_versions(fx: &Fixture) -> Document {
        let ws = fx.workspace().await;
        fx.upload(ws.id, None, "report.pdf", b"one").await;
        fx.upload(ws.id, None, "report.pdf", b"two!").await;
        fx.upload(ws.id, None, "report.pdf", b"three").await
    }

    #[tokio::test]
    async fn test_ledger_records_upload_time_not_last_edit() {
        let fx = Fixture::new();
        let ws = fx.workspace().await;
        let first = fx.upload(ws.id, None, "report.pdf", b"one").await;
        let tagged = fx
            .document_service()
            .update_document(
                &fx.ctx,
                first.id,
                crate::document::UpdateDocumentRequest {
                    tags: Some(vec!["q3".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(tagged.content_uploaded_at(), first.content_uploaded_at());

        let second = fx.upload(ws.id, None, "report.pdf", b"two!").await;
        assert_eq!(second.versions.len(), 1);
        assert_eq!(second.versions[0].uploaded_at, first.content_uploaded_at());
        assert!(second.content_uploaded_at() >= tagged.updated_at);
    }

    #[tokio::test]
    async fn test_versions_are_listed_newest_first() {
        let fx = Fixture::new();
        let doc = three_versions(&fx).await;
        let versions = fx
            .version_service()
            .get_document_versions(&fx.ctx, doc.id)
            .await
            .unwrap();
        let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
        assert_eq!(numbers, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_restore_pushes_current_state_first() {
        let fx = Fixture::new();
        let svc = fx.version_service();
        let doc = three_versions(&fx).await;
        let current_blob = doc.file_path.clone();
        let v1 = doc.versions[0].clone();

        let restored = svc
            .restore_document_version(&fx.ctx, doc.id, v1.id)
            .await
            .unwrap();

        assert_eq!(restored.version(), 4);
        assert_eq!(restored.file_path, v1.file_path);
        assert_eq!(restored.metadata.size, v1.size);
        let pushed = restored.versions.last().unwrap();
        assert_eq!(pushed.file_path, current_blob);
        assert_eq!(pushed.version, 3);
        assert_eq!(restored.versions.len(), 3);
    }

    #[tokio::test]
    async fn test_restore_unknown_version_is_not_found() {
        let fx = Fixture::new();
        let doc = three_versions(&fx).await;
        let err = fx
            .version_service()
            .restore_document_version(&fx.ctx, doc.id, DocumentVersionId::new())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_delete_by_index_checks_bounds_and_deletes_blob() {
        let fx = Fixture::new();
        let svc = fx.version_service();
        let doc = three_versions(&fx).await;
        assert_eq!(fx.blobs.len(), 3);

        for bad in [-1, 2] {
            let err = svc
                .delete_document_version(&fx.ctx, doc.id, bad)
                .await
                .unwrap_err();
            assert!(err.is(ErrorKind::OutOfRange));
        }

        let pruned = svc.delete_document_version(&fx.ctx, doc.id, 0).await.unwrap();
        assert_eq!(pruned.versions.len(), 1);
        assert_eq!(pruned.versions[0].version, 2);
        assert_eq!(pruned.version(), 3);
        assert_eq!(fx.blobs.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_keeps_blob_still_referenced() {
        let fx = Fixture::new();
        let svc = fx.version_service();
        let doc = three_versions(&fx).await;
        let v1 = doc.versions[0].clone();
        // Restoring v1 makes the current state point at v1's blob.
        svc.restore_document_version(&fx.ctx, doc.id, v1.id)
            .await
            .unwrap();

        let pruned = svc
            .delete_document_version_by_id(&fx.ctx, doc.id, v1.id)
            .await
            .unwrap();
        assert!(pruned.find_version(v1.id).is_none());
        let blob = v1.file_path.unwrap();
        assert!(fx.blobs.contains(&blob));
    }
}
