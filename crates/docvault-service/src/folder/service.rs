//! Folder CRUD, moves and recycle-bin cascades.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use docvault_core::config::ContentConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FolderId, OwnerKey, WorkspaceId};
use docvault_database::{DocumentFilter, FolderFilter, FolderScope, ParentScope};
use docvault_entity::SoftDelete;
use docvault_entity::folder::{Folder, FolderMetadata, PATH_SEPARATOR};

use super::walk::{ancestors, collect_subtree, depth_exceeded};
use crate::context::RequestContext;
use crate::store::ContentStore;
use crate::validation::validate_name;

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Workspace the folder is created in.
    pub workspace_id: WorkspaceId,
    /// Parent folder ID (None for root-level).
    pub parent_folder_id: Option<FolderId>,
    /// Folder name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Presentation and sharing metadata.
    #[serde(default)]
    pub metadata: Option<FolderMetadata>,
}

/// Partial update of a folder. Unset fields are left unchanged.
///
/// `parent_folder_id: Some(None)` moves the folder to the workspace root.
#[derive(Debug, Clone, Default)]
pub struct UpdateFolderRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New metadata.
    pub metadata: Option<FolderMetadata>,
    /// New parent.
    pub parent_folder_id: Option<Option<FolderId>>,
}

/// Manages folder CRUD and the recycle-bin lifecycle of folder subtrees.
#[derive(Debug, Clone)]
pub struct FolderService {
    store: ContentStore,
    max_depth: usize,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: ContentStore, content: &ContentConfig) -> Self {
        Self {
            store,
            max_depth: content.max_tree_depth,
        }
    }

    /// Creates a new folder.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        req.validate()?;
        validate_name("Folder", &req.name)?;
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_workspace(&owner, req.workspace_id).await?;

        let parent = match req.parent_folder_id {
            Some(parent_id) => {
                let parent = self
                    .store
                    .folders
                    .find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(format!("Parent folder {parent_id} not found"))
                    })?;
                parent.ensure_live()?;
                if !parent.is_owned_by(&owner) || parent.workspace_id != req.workspace_id {
                    return Err(AppError::forbidden(
                        "Parent folder belongs to another owner or workspace",
                    ));
                }
                Some(parent)
            }
            None => None,
        };

        self.ensure_name_free(req.workspace_id, req.parent_folder_id, &req.name, None)
            .await?;

        let folder = Folder::new(
            req.workspace_id,
            req.parent_folder_id,
            parent.as_ref().map(|p| p.path.as_str()),
            owner,
            req.name,
            req.description.unwrap_or_default(),
            req.metadata.unwrap_or_default(),
        );
        let folder = self.store.folders.insert(&folder).await?;

        info!(
            owner = %folder.owner_key,
            folder_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );
        Ok(folder)
    }

    /// Gets a folder by ID, in any lifecycle state.
    pub async fn get_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_folder(&owner, folder_id).await
    }

    /// Lists the caller's live folders directly under `parent_folder_id`
    /// (workspace root when `None`), ordered by name.
    pub async fn list_folders(
        &self,
        ctx: &RequestContext,
        workspace_id: WorkspaceId,
        parent_folder_id: Option<FolderId>,
    ) -> AppResult<Vec<Folder>> {
        let owner = self.store.owner_of(ctx).await?;
        let filter = FolderFilter {
            parent: ParentScope::children_of(parent_folder_id),
            ..FolderFilter::live(owner).in_workspace(workspace_id)
        };
        let mut folders = self.store.folders.find(&filter).await?;
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    /// Updates name, description, metadata and/or parent.
    ///
    /// Every check runs before the first write. When the name or parent
    /// changes, the materialized path of the folder and of its whole subtree
    /// is recomputed.
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<Folder> {
        let owner = self.store.owner_of(ctx).await?;
        let mut folder = self.store.owned_folder(&owner, folder_id).await?;
        folder.ensure_live()?;

        if let Some(name) = &req.name {
            validate_name("Folder", name)?;
        }

        let target_parent = req.parent_folder_id.unwrap_or(folder.parent_folder_id);
        let parent_changed = target_parent != folder.parent_folder_id;
        let parent_path = match target_parent {
            Some(parent_id) if parent_changed => {
                Some(self.check_new_parent(&owner, &folder, parent_id).await?.path)
            }
            Some(_) => folder
                .path
                .rsplit_once(PATH_SEPARATOR)
                .map(|(prefix, _)| prefix.to_string()),
            None => None,
        };

        let target_name = req.name.clone().unwrap_or_else(|| folder.name.clone());
        let name_changed = target_name != folder.name;
        if name_changed || parent_changed {
            self.ensure_name_free(folder.workspace_id, target_parent, &target_name, Some(folder.id))
                .await?;
        }

        folder.name = target_name;
        folder.parent_folder_id = target_parent;
        if let Some(description) = req.description {
            folder.description = description;
        }
        if let Some(metadata) = req.metadata {
            folder.metadata = metadata;
        }
        let old_path = folder.path.clone();
        folder.rebase(parent_path.as_deref());
        folder.updated_at = Utc::now();

        let folder = self.store.folders.update(&folder).await?;
        if folder.path != old_path {
            let rewritten = self.rewrite_descendant_paths(&folder).await?;
            debug!(folder_id = %folder.id, descendants = rewritten, "Recomputed descendant paths");
        }

        info!(
            owner = %owner,
            folder_id = %folder.id,
            path = %folder.path,
            moved = parent_changed,
            "Folder updated"
        );
        Ok(folder)
    }

    /// Soft-deletes the folder, every live folder beneath it and every live
    /// document in the subtree. Children are written before parents, so a
    /// repeated call completes an interrupted cascade.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let owner = self.store.owner_of(ctx).await?;
        let root = self.store.owned_folder(&owner, folder_id).await?;
        root.ensure_live()?;

        let now = Utc::now();
        let subtree = collect_subtree(self.store.folders.as_ref(), root, self.max_depth).await?;
        let mut folders_deleted = 0u64;
        let mut documents_deleted = 0u64;

        for mut folder in subtree.into_iter().rev() {
            documents_deleted += self
                .store
                .documents
                .soft_delete_live_in_folder(folder.id, now)
                .await?;
            if !folder.is_deleted() {
                folder.mark_deleted(now);
                self.store.folders.update(&folder).await?;
                folders_deleted += 1;
            }
        }

        info!(
            owner = %owner,
            folder_id = %folder_id,
            folders = folders_deleted,
            documents = documents_deleted,
            "Folder moved to recycle bin"
        );
        Ok(())
    }

    /// Restores a soft-deleted folder. Descendants stay in the recycle bin.
    pub async fn restore_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Folder> {
        let owner = self.store.owner_of(ctx).await?;
        let mut folder = self.store.owned_folder(&owner, folder_id).await?;
        folder.ensure_deleted()?;

        if let Some(parent_id) = folder.parent_folder_id {
            match self.store.folders.find_by_id(parent_id).await? {
                None => {
                    return Err(AppError::conflict(
                        "Cannot restore folder: its parent folder no longer exists",
                    ));
                }
                Some(parent) if parent.is_deleted() => {
                    return Err(AppError::conflict(
                        "Cannot restore folder: its parent folder is in the recycle bin",
                    ));
                }
                Some(_) => {}
            }
        }
        self.ensure_name_free(
            folder.workspace_id,
            folder.parent_folder_id,
            &folder.name,
            Some(folder.id),
        )
        .await?;

        folder.mark_restored();
        let folder = self.store.folders.update(&folder).await?;
        info!(owner = %owner, folder_id = %folder.id, path = %folder.path, "Folder restored");
        Ok(folder)
    }

    /// Permanently removes a soft-deleted folder and its whole subtree.
    ///
    /// For each folder, leaves first: the blobs of its documents are deleted
    /// (failures are logged), then the document records, then the folder.
    pub async fn permanently_delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<()> {
        let owner = self.store.owner_of(ctx).await?;
        let root = self.store.owned_folder(&owner, folder_id).await?;
        root.ensure_deleted()?;

        let subtree = collect_subtree(self.store.folders.as_ref(), root, self.max_depth).await?;
        let folder_total = subtree.len();
        let mut document_total = 0u64;

        for folder in subtree.into_iter().rev() {
            let documents = self
                .store
                .documents
                .find(&DocumentFilter {
                    folder: FolderScope::In(folder.id),
                    ..DocumentFilter::default()
                })
                .await?;
            for document in &documents {
                self.store.purge_blobs(&document.blob_handles()).await;
            }
            let ids: Vec<_> = documents.iter().map(|d| d.id).collect();
            document_total += self.store.documents.delete_many(&ids).await?;
            self.store.folders.delete(folder.id).await?;
        }

        info!(
            owner = %owner,
            folder_id = %folder_id,
            folders = folder_total,
            documents = document_total,
            "Folder permanently deleted"
        );
        Ok(())
    }

    /// Case-insensitive name search over the caller's live folders, most
    /// recently updated first.
    pub async fn search_folders(
        &self,
        ctx: &RequestContext,
        name: Option<&str>,
        workspace_id: Option<WorkspaceId>,
    ) -> AppResult<Vec<Folder>> {
        let owner = self.store.owner_of(ctx).await?;
        let filter = FolderFilter {
            workspace_id,
            name_contains: name.filter(|n| !n.is_empty()).map(str::to_string),
            ..FolderFilter::live(owner)
        };
        let mut folders = self.store.folders.find(&filter).await?;
        folders.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(folders)
    }

    /// Lists the caller's soft-deleted folders, most recently deleted first.
    pub async fn list_deleted_folders(
        &self,
        ctx: &RequestContext,
        workspace_id: Option<WorkspaceId>,
    ) -> AppResult<Vec<Folder>> {
        let owner = self.store.owner_of(ctx).await?;
        let filter = FolderFilter {
            owner_key: Some(owner),
            workspace_id,
            deleted: Some(true),
            ..FolderFilter::default()
        };
        let mut folders = self.store.folders.find(&filter).await?;
        folders.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(folders)
    }

    /// Validate a move target: it exists, is live, shares the workspace and
    /// owner, and is neither the folder nor one of its descendants.
    async fn check_new_parent(
        &self,
        owner: &OwnerKey,
        folder: &Folder,
        parent_id: FolderId,
    ) -> AppResult<Folder> {
        let parent = self
            .store
            .folders
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Parent folder {parent_id} not found")))?;

        // A descendant stays a descendant while in the recycle bin.
        let chain = ancestors(self.store.folders.as_ref(), parent_id, self.max_depth).await?;
        if chain.iter().any(|ancestor| ancestor.id == folder.id) {
            return Err(AppError::cycle_detected(
                "Cannot move a folder into itself or one of its descendants",
            ));
        }

        parent.ensure_live()?;
        if parent.workspace_id != folder.workspace_id {
            return Err(AppError::cross_workspace(
                "Folders cannot move between workspaces",
            ));
        }
        if !parent.is_owned_by(owner) {
            return Err(AppError::forbidden("Parent folder belongs to another owner"));
        }
        Ok(parent)
    }

    /// Fail with `Conflict` if a live sibling other than `except` already
    /// uses `name`.
    async fn ensure_name_free(
        &self,
        workspace_id: WorkspaceId,
        parent: Option<FolderId>,
        name: &str,
        except: Option<FolderId>,
    ) -> AppResult<()> {
        let existing = self
            .store
            .folders
            .find_live_sibling(workspace_id, parent, name)
            .await?;
        match existing {
            Some(sibling) if Some(sibling.id) != except => Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            ))),
            _ => Ok(()),
        }
    }

    /// Recompute the path of every folder beneath `root`, depth-first.
    async fn rewrite_descendant_paths(&self, root: &Folder) -> AppResult<usize> {
        let mut rewritten = 0;
        let mut stack = vec![(root.id, root.path.clone(), 0usize)];

        while let Some((parent_id, parent_path, depth)) = stack.pop() {
            if depth >= self.max_depth {
                return Err(depth_exceeded(self.max_depth));
            }
            let children = self
                .store
                .folders
                .find(&FolderFilter::children_of(parent_id))
                .await?;
            for mut child in children {
                child.rebase(Some(&parent_path));
                child.updated_at = Utc::now();
                let child = self.store.folders.update(&child).await?;
                rewritten += 1;
                stack.push((child.id, child.path, depth + 1));
            }
        }

        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;
    use docvault_entity::folder::child_path;

    use crate::testing::Fixture;

    async fn assert_paths_consistent(fx: &Fixture, workspace_id: WorkspaceId) {
        let all = fx
            .store
            .folders
            .find(&FolderFilter::default().in_workspace(workspace_id))
            .await
            .unwrap();
        for folder in &all {
            let parent_path = folder
                .parent_folder_id
                .and_then(|id| all.iter().find(|f| f.id == id))
                .map(|p| p.path.as_str());
            assert_eq!(folder.path, child_path(parent_path, &folder.name));
        }
    }

    #[tokio::test]
    async fn test_create_builds_materialized_path() {
        let fx = Fixture::new();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;

        assert_eq!(docs.path, "/Docs");
        assert_eq!(y2024.path, "/Docs/2024");
        assert!(!y2024.is_root());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_live_sibling() {
        let fx = Fixture::new();
        let ws = fx.workspace().await;
        fx.folder(ws.id, None, "Docs").await;

        let err = fx
            .folder_service()
            .create_folder(&fx.ctx, Fixture::folder_request(ws.id, None, "Docs"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_create_under_missing_or_deleted_parent() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;

        let err = svc
            .create_folder(&fx.ctx, Fixture::folder_request(ws.id, Some(FolderId::new()), "x"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));

        let docs = fx.folder(ws.id, None, "Docs").await;
        svc.delete_folder(&fx.ctx, docs.id).await.unwrap();
        let err = svc
            .create_folder(&fx.ctx, Fixture::folder_request(ws.id, Some(docs.id), "x"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidState));
    }

    #[tokio::test]
    async fn test_create_rejects_separator_in_name() {
        let fx = Fixture::new();
        let ws = fx.workspace().await;
        let err = fx
            .folder_service()
            .create_folder(&fx.ctx, Fixture::folder_request(ws.id, None, "a/b"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_create_in_foreign_workspace_is_forbidden() {
        let fx = Fixture::new();
        let ws = fx.workspace().await;
        let other = fx.other_caller();
        let err = fx
            .folder_service()
            .create_folder(&other, Fixture::folder_request(ws.id, None, "Docs"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Forbidden));
    }

    #[tokio::test]
    async fn test_rename_rewrites_descendant_paths() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;
        let q1 = fx.folder(ws.id, Some(y2024.id), "Q1").await;

        svc.update_folder(
            &fx.ctx,
            docs.id,
            UpdateFolderRequest {
                name: Some("Papers".to_string()),
                ..UpdateFolderRequest::default()
            },
        )
        .await
        .unwrap();

        let q1 = svc.get_folder(&fx.ctx, q1.id).await.unwrap();
        assert_eq!(q1.path, "/Papers/2024/Q1");
        assert_paths_consistent(&fx, ws.id).await;
    }

    #[tokio::test]
    async fn test_move_to_root_and_under_sibling() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let archive = fx.folder(ws.id, None, "Archive").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;
        fx.folder(ws.id, Some(y2024.id), "Q1").await;

        let moved = svc
            .update_folder(
                &fx.ctx,
                y2024.id,
                UpdateFolderRequest {
                    parent_folder_id: Some(Some(archive.id)),
                    ..UpdateFolderRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.path, "/Archive/2024");
        assert_paths_consistent(&fx, ws.id).await;

        let moved = svc
            .update_folder(
                &fx.ctx,
                y2024.id,
                UpdateFolderRequest {
                    parent_folder_id: Some(None),
                    ..UpdateFolderRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.path, "/2024");
        assert!(moved.is_root());
        assert_paths_consistent(&fx, ws.id).await;
    }

    #[tokio::test]
    async fn test_move_into_own_subtree_is_a_cycle() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;
        let q1 = fx.folder(ws.id, Some(y2024.id), "Q1").await;

        for target in [docs.id, q1.id] {
            let err = svc
                .update_folder(
                    &fx.ctx,
                    docs.id,
                    UpdateFolderRequest {
                        parent_folder_id: Some(Some(target)),
                        ..UpdateFolderRequest::default()
                    },
                )
                .await
                .unwrap_err();
            assert!(err.is(ErrorKind::CycleDetected));
        }

        let docs_after = svc.get_folder(&fx.ctx, docs.id).await.unwrap();
        assert!(docs_after.is_root());
        assert_eq!(docs_after.path, "/Docs");
        assert_paths_consistent(&fx, ws.id).await;
    }

    #[tokio::test]
    async fn test_move_under_deleted_descendant_is_a_cycle() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;
        svc.delete_folder(&fx.ctx, y2024.id).await.unwrap();

        let err = svc
            .update_folder(
                &fx.ctx,
                docs.id,
                UpdateFolderRequest {
                    parent_folder_id: Some(Some(y2024.id)),
                    ..UpdateFolderRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::CycleDetected));

        let docs_after = svc.get_folder(&fx.ctx, docs.id).await.unwrap();
        assert!(docs_after.is_root());
        assert_eq!(docs_after.path, "/Docs");
    }

    #[tokio::test]
    async fn test_move_across_workspaces_is_rejected() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let ws2 = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let elsewhere = fx.folder(ws2.id, None, "Elsewhere").await;

        let err = svc
            .update_folder(
                &fx.ctx,
                docs.id,
                UpdateFolderRequest {
                    parent_folder_id: Some(Some(elsewhere.id)),
                    ..UpdateFolderRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::CrossWorkspace));
    }

    #[tokio::test]
    async fn test_rename_onto_live_sibling_conflicts() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        fx.folder(ws.id, None, "Docs").await;
        let other = fx.folder(ws.id, None, "Other").await;

        let err = svc
            .update_folder(
                &fx.ctx,
                other.id,
                UpdateFolderRequest {
                    name: Some("Docs".to_string()),
                    ..UpdateFolderRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_delete_cascades_and_restore_does_not() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;
        let report = fx.upload(ws.id, Some(y2024.id), "report.pdf", b"pdf").await;

        svc.delete_folder(&fx.ctx, docs.id).await.unwrap();

        for id in [docs.id, y2024.id] {
            let folder = svc.get_folder(&fx.ctx, id).await.unwrap();
            assert!(folder.deleted);
            assert!(folder.deleted_at.is_some());
        }
        let report_after = fx.store.documents.find_by_id(report.id).await.unwrap().unwrap();
        assert!(report_after.deleted);
        assert!(svc.list_folders(&fx.ctx, ws.id, None).await.unwrap().is_empty());

        svc.restore_folder(&fx.ctx, docs.id).await.unwrap();
        let roots = svc.list_folders(&fx.ctx, ws.id, None).await.unwrap();
        assert_eq!(roots.len(), 1);
        assert!(svc.list_folders(&fx.ctx, ws.id, Some(docs.id)).await.unwrap().is_empty());
        assert!(svc.get_folder(&fx.ctx, y2024.id).await.unwrap().deleted);
    }

    #[tokio::test]
    async fn test_delete_completes_interrupted_cascade() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;

        // Simulate a cascade that stopped after the child was written.
        let mut child = y2024.clone();
        let earlier = Utc::now() - chrono::Duration::minutes(5);
        child.mark_deleted(earlier);
        fx.store.folders.update(&child).await.unwrap();

        svc.delete_folder(&fx.ctx, docs.id).await.unwrap();
        assert!(svc.get_folder(&fx.ctx, docs.id).await.unwrap().deleted);
        let child = svc.get_folder(&fx.ctx, y2024.id).await.unwrap();
        assert_eq!(child.deleted_at, Some(earlier));
    }

    #[tokio::test]
    async fn test_restore_under_deleted_parent_conflicts() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;
        svc.delete_folder(&fx.ctx, docs.id).await.unwrap();

        let err = svc.restore_folder(&fx.ctx, y2024.id).await.unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
        assert!(svc.get_folder(&fx.ctx, y2024.id).await.unwrap().deleted);
    }

    #[tokio::test]
    async fn test_restore_requires_deleted_state() {
        let fx = Fixture::new();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let err = fx
            .folder_service()
            .restore_folder(&fx.ctx, docs.id)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidState));
    }

    #[tokio::test]
    async fn test_purge_requires_deleted_and_removes_subtree_and_blobs() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        let docs = fx.folder(ws.id, None, "Docs").await;
        let y2024 = fx.folder(ws.id, Some(docs.id), "2024").await;
        let report = fx.upload(ws.id, Some(y2024.id), "report.pdf", b"v1").await;
        fx.upload(ws.id, Some(y2024.id), "report.pdf", b"v2").await;
        assert_eq!(fx.blobs.len(), 2);

        let err = svc
            .permanently_delete_folder(&fx.ctx, docs.id)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidState));

        svc.delete_folder(&fx.ctx, docs.id).await.unwrap();
        svc.permanently_delete_folder(&fx.ctx, docs.id).await.unwrap();

        assert!(fx.store.folders.find_by_id(docs.id).await.unwrap().is_none());
        assert!(fx.store.folders.find_by_id(y2024.id).await.unwrap().is_none());
        assert!(fx.store.documents.find_by_id(report.id).await.unwrap().is_none());
        assert!(fx.blobs.is_empty());
    }

    #[tokio::test]
    async fn test_search_and_deleted_listing() {
        let fx = Fixture::new();
        let svc = fx.folder_service();
        let ws = fx.workspace().await;
        fx.folder(ws.id, None, "Quarterly Reports").await;
        let invoices = fx.folder(ws.id, None, "Invoices").await;

        let found = svc.search_folders(&fx.ctx, Some("report"), None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Quarterly Reports");

        svc.delete_folder(&fx.ctx, invoices.id).await.unwrap();
        let deleted = svc.list_deleted_folders(&fx.ctx, Some(ws.id)).await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].id, invoices.id);
        assert_eq!(svc.search_folders(&fx.ctx, None, None).await.unwrap().len(), 1);
    }
}
