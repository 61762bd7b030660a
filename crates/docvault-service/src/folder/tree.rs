//! Folder tree building and path resolution.

use std::collections::HashMap;

use tracing::debug;

use docvault_core::config::ContentConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FolderId, WorkspaceId};
use docvault_database::{DocumentFilter, FolderFilter};
use docvault_entity::document::Document;
use docvault_entity::folder::{
    Folder, FolderContentsNode, FolderTreeNode, WorkspaceStructure,
};

use super::walk::{ancestors, build_forest};
use crate::context::RequestContext;
use crate::store::ContentStore;

/// Builds folder trees and resolves ancestry.
#[derive(Debug, Clone)]
pub struct TreeService {
    store: ContentStore,
    max_depth: usize,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(store: ContentStore, content: &ContentConfig) -> Self {
        Self {
            store,
            max_depth: content.max_tree_depth,
        }
    }

    /// Builds the live folder tree of a workspace, below `parent_folder_id`
    /// or from the workspace root. Each node carries the number of live
    /// documents directly inside it.
    pub async fn get_folder_tree(
        &self,
        ctx: &RequestContext,
        workspace_id: WorkspaceId,
        parent_folder_id: Option<FolderId>,
    ) -> AppResult<Vec<FolderTreeNode>> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_workspace(&owner, workspace_id).await?;
        if let Some(parent_id) = parent_folder_id {
            let parent = self.store.owned_folder(&owner, parent_id).await?;
            if parent.workspace_id != workspace_id {
                return Err(AppError::cross_workspace(format!(
                    "Folder {parent_id} is not in workspace {workspace_id}"
                )));
            }
        }

        let folders = self
            .store
            .folders
            .find(&FolderFilter::live(owner).in_workspace(workspace_id))
            .await?;
        let ids: Vec<FolderId> = folders.iter().map(|f| f.id).collect();
        let counts = self.store.documents.count_live_by_folder(&ids).await?;
        debug!(
            workspace_id = %workspace_id,
            folders = folders.len(),
            "Building folder tree"
        );

        build_forest(parent_folder_id, folders, self.max_depth, |folder, children| {
            FolderTreeNode {
                document_count: counts.get(&folder.id).copied().unwrap_or(0),
                folder,
                children,
            }
        })
    }

    /// Builds the live folder tree of a workspace with each node carrying
    /// its live documents; documents outside any folder are returned
    /// alongside.
    pub async fn get_workspace_structure(
        &self,
        ctx: &RequestContext,
        workspace_id: WorkspaceId,
    ) -> AppResult<WorkspaceStructure> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_workspace(&owner, workspace_id).await?;

        let folders = self
            .store
            .folders
            .find(&FolderFilter::live(owner.clone()).in_workspace(workspace_id))
            .await?;
        let documents = self
            .store
            .documents
            .find(&DocumentFilter {
                workspace_id: Some(workspace_id),
                ..DocumentFilter::live(owner)
            })
            .await?;

        let mut by_folder: HashMap<Option<FolderId>, Vec<Document>> = HashMap::new();
        for document in documents {
            by_folder.entry(document.folder_id).or_default().push(document);
        }
        for group in by_folder.values_mut() {
            group.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let folders = build_forest(None, folders, self.max_depth, |folder, children| {
            FolderContentsNode {
                documents: by_folder.remove(&Some(folder.id)).unwrap_or_default(),
                folder,
                children,
            }
        })?;
        let unfiled_documents = by_folder.remove(&None).unwrap_or_default();

        Ok(WorkspaceStructure {
            folders,
            unfiled_documents,
        })
    }

    /// Gets the ancestor chain from the workspace root down to the folder.
    pub async fn get_breadcrumbs(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<Folder>> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_folder(&owner, folder_id).await?;

        let mut chain = ancestors(self.store.folders.as_ref(), folder_id, self.max_depth).await?;
        chain.reverse();
        Ok(chain)
    }
}
