//! Shared dependencies and ownership checks used by every service.

use std::sync::Arc;

use tracing::warn;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{BlobStore, OwnerResolver};
use docvault_core::types::{BlobId, DocumentId, FolderId, OwnerKey, WorkspaceId};
use docvault_database::{DocumentRepository, FolderRepository, WorkspaceRepository};
use docvault_entity::SoftDelete;
use docvault_entity::document::Document;
use docvault_entity::folder::Folder;
use docvault_entity::workspace::Workspace;

use crate::context::RequestContext;

/// Repositories, blob store and owner resolver shared by the services.
#[derive(Debug, Clone)]
pub struct ContentStore {
    /// Workspace repository.
    pub workspaces: Arc<dyn WorkspaceRepository>,
    /// Folder repository.
    pub folders: Arc<dyn FolderRepository>,
    /// Document repository.
    pub documents: Arc<dyn DocumentRepository>,
    /// Binary content backend.
    pub blobs: Arc<dyn BlobStore>,
    /// Caller to owner-key resolution.
    pub owners: Arc<dyn OwnerResolver>,
}

impl ContentStore {
    /// Bundle the given dependencies.
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        folders: Arc<dyn FolderRepository>,
        documents: Arc<dyn DocumentRepository>,
        blobs: Arc<dyn BlobStore>,
        owners: Arc<dyn OwnerResolver>,
    ) -> Self {
        Self {
            workspaces,
            folders,
            documents,
            blobs,
            owners,
        }
    }

    /// Resolve the caller of `ctx` to an owner key.
    pub async fn owner_of(&self, ctx: &RequestContext) -> AppResult<OwnerKey> {
        self.owners.resolve_owner_key(&ctx.caller_id).await
    }

    /// Load a workspace owned by `owner`.
    pub async fn owned_workspace(&self, owner: &OwnerKey, id: WorkspaceId) -> AppResult<Workspace> {
        let workspace = self
            .workspaces
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workspace {id} not found")))?;
        if !workspace.is_owned_by(owner) {
            return Err(AppError::forbidden("Workspace belongs to another owner"));
        }
        Ok(workspace)
    }

    /// Load a folder owned by `owner`, in any lifecycle state.
    pub async fn owned_folder(&self, owner: &OwnerKey, id: FolderId) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        if !folder.is_owned_by(owner) {
            return Err(AppError::forbidden("Folder belongs to another owner"));
        }
        Ok(folder)
    }

    /// Load a document owned by `owner`, in any lifecycle state.
    pub async fn owned_document(&self, owner: &OwnerKey, id: DocumentId) -> AppResult<Document> {
        let document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;
        if !document.is_owned_by(owner) {
            return Err(AppError::forbidden("Document belongs to another owner"));
        }
        Ok(document)
    }

    /// Check that `folder_id` can hold a document of `owner` in
    /// `workspace_id`: it exists, is live, is the owner's and lives in the
    /// same workspace.
    pub async fn placement_folder(
        &self,
        owner: &OwnerKey,
        workspace_id: WorkspaceId,
        folder_id: FolderId,
    ) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        folder.ensure_live()?;
        if !folder.is_owned_by(owner) {
            return Err(AppError::forbidden("Folder belongs to another owner"));
        }
        if folder.workspace_id != workspace_id {
            return Err(AppError::cross_workspace(format!(
                "Folder {folder_id} is not in workspace {workspace_id}"
            )));
        }
        Ok(folder)
    }

    /// Delete blobs, logging failures instead of returning them.
    pub async fn purge_blobs(&self, handles: &[BlobId]) {
        for handle in handles {
            if let Err(e) = self.blobs.delete(handle).await {
                warn!(blob = %handle, error = %e, "Failed to delete blob during purge");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_purges_survive_blob_delete_failures() {
        let fx = Fixture::with_failing_blob_deletes();
        let folders = fx.folder_service();
        let documents = fx.document_service();
        let ws = fx.workspace().await;

        // Folder purge.
        let docs = fx.folder(ws.id, None, "Docs").await;
        let in_docs = fx.upload(ws.id, Some(docs.id), "a.pdf", b"a").await;
        folders.delete_folder(&fx.ctx, docs.id).await.unwrap();
        folders
            .permanently_delete_folder(&fx.ctx, docs.id)
            .await
            .unwrap();
        assert!(fx.store.folders.find_by_id(docs.id).await.unwrap().is_none());
        assert!(fx.store.documents.find_by_id(in_docs.id).await.unwrap().is_none());

        // Single document purge.
        let single = fx.upload(ws.id, None, "b.pdf", b"b").await;
        documents.delete_document(&fx.ctx, single.id).await.unwrap();
        documents
            .permanently_delete_document(&fx.ctx, single.id)
            .await
            .unwrap();
        assert!(fx.store.documents.find_by_id(single.id).await.unwrap().is_none());

        // Recycle bin.
        let c = fx.upload(ws.id, None, "c.pdf", b"c").await;
        let d = fx.upload(ws.id, None, "d.pdf", b"d").await;
        documents.delete_document(&fx.ctx, c.id).await.unwrap();
        documents.delete_document(&fx.ctx, d.id).await.unwrap();
        let removed = documents
            .empty_recycle_bin(&fx.ctx, Some(ws.id), None)
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(fx.store.documents.find_by_id(c.id).await.unwrap().is_none());
        assert!(fx.store.documents.find_by_id(d.id).await.unwrap().is_none());

        // Every blob is still present because each delete was refused.
        assert_eq!(fx.blobs.len(), 4);
    }
}
