//! Recycle bin view across folders and documents.

use serde::{Deserialize, Serialize};

use docvault_core::result::AppResult;
use docvault_core::types::{FolderId, WorkspaceId};
use docvault_database::{DocumentFilter, FolderFilter};
use docvault_entity::document::Document;
use docvault_entity::folder::Folder;

use crate::context::RequestContext;
use crate::document::DocumentService;
use crate::store::ContentStore;

/// The caller's soft-deleted records, most recently deleted first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecycleBinContents {
    /// Deleted folders.
    pub folders: Vec<Folder>,
    /// Deleted documents.
    pub documents: Vec<Document>,
}

impl RecycleBinContents {
    /// Whether the bin holds nothing.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.documents.is_empty()
    }
}

/// Lists and empties the recycle bin.
#[derive(Debug, Clone)]
pub struct RecycleBinService {
    store: ContentStore,
    documents: DocumentService,
}

impl RecycleBinService {
    /// Creates a new recycle bin service.
    pub fn new(store: ContentStore, documents: DocumentService) -> Self {
        Self { store, documents }
    }

    /// Lists the caller's soft-deleted folders and documents.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        workspace_id: Option<WorkspaceId>,
    ) -> AppResult<RecycleBinContents> {
        let owner = self.store.owner_of(ctx).await?;

        let mut folders = self
            .store
            .folders
            .find(&FolderFilter {
                owner_key: Some(owner.clone()),
                workspace_id,
                deleted: Some(true),
                ..FolderFilter::default()
            })
            .await?;
        folders.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));

        let mut documents = self
            .store
            .documents
            .find(&DocumentFilter {
                workspace_id,
                ..DocumentFilter::deleted(owner)
            })
            .await?;
        documents.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));

        Ok(RecycleBinContents { folders, documents })
    }

    /// Permanently removes the caller's deleted documents matching the
    /// filters. Returns the number removed.
    pub async fn empty(
        &self,
        ctx: &RequestContext,
        workspace_id: Option<WorkspaceId>,
        folder_id: Option<FolderId>,
    ) -> AppResult<u64> {
        self.documents
            .empty_recycle_bin(ctx, workspace_id, folder_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_list_shows_cascade_results() {
        let fx = Fixture::new();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        fx.folder(ws.id, Some(docs.id), "2024").await;
        fx.upload(ws.id, Some(docs.id), "a.pdf", b"a").await;
        fx.folder_service().delete_folder(&fx.ctx, docs.id).await.unwrap();

        let svc = fx.recycle_bin_service();
        let bin = svc.list(&fx.ctx, Some(ws.id)).await.unwrap();
        assert_eq!(bin.folders.len(), 2);
        assert_eq!(bin.documents.len(), 1);

        let other = fx.other_caller();
        assert!(svc.list(&other, None).await.unwrap().is_empty());

        assert_eq!(svc.empty(&fx.ctx, Some(ws.id), None).await.unwrap(), 1);
        let bin = svc.list(&fx.ctx, Some(ws.id)).await.unwrap();
        assert!(bin.documents.is_empty());
        assert_eq!(bin.folders.len(), 2);
    }
}
