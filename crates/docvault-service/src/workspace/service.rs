//! Workspace CRUD scoped to the caller's owner key.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use docvault_core::result::AppResult;
use docvault_core::types::WorkspaceId;
use docvault_database::FolderFilter;
use docvault_entity::workspace::Workspace;

use crate::context::RequestContext;
use crate::store::ContentStore;

/// Request to create a workspace.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    /// Display title.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Free-form type label.
    #[serde(default)]
    pub workspace_type: String,
    /// Free-form structure blob.
    #[serde(default)]
    pub structure: Option<serde_json::Value>,
}

/// Partial update of a workspace. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateWorkspaceRequest {
    /// New title.
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// New type label.
    pub workspace_type: Option<String>,
    /// New structure blob.
    pub structure: Option<serde_json::Value>,
}

/// Manages workspaces.
#[derive(Debug, Clone)]
pub struct WorkspaceService {
    store: ContentStore,
}

impl WorkspaceService {
    /// Creates a new workspace service.
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    /// Creates a workspace owned by the caller.
    pub async fn create_workspace(
        &self,
        ctx: &RequestContext,
        req: CreateWorkspaceRequest,
    ) -> AppResult<Workspace> {
        req.validate()?;
        let owner = self.store.owner_of(ctx).await?;

        let workspace = Workspace::new(owner, req.title, req.workspace_type, req.structure);
        let workspace = self.store.workspaces.insert(&workspace).await?;

        info!(
            owner = %workspace.owner_key,
            workspace_id = %workspace.id,
            title = %workspace.title,
            "Workspace created"
        );
        Ok(workspace)
    }

    /// Lists the caller's workspaces, newest first.
    pub async fn list_workspaces(&self, ctx: &RequestContext) -> AppResult<Vec<Workspace>> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.workspaces.find_by_owner(&owner).await
    }

    /// Gets one of the caller's workspaces.
    pub async fn get_workspace(
        &self,
        ctx: &RequestContext,
        workspace_id: WorkspaceId,
    ) -> AppResult<Workspace> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_workspace(&owner, workspace_id).await
    }

    /// Updates title, type or structure.
    pub async fn update_workspace(
        &self,
        ctx: &RequestContext,
        workspace_id: WorkspaceId,
        req: UpdateWorkspaceRequest,
    ) -> AppResult<Workspace> {
        req.validate()?;
        let owner = self.store.owner_of(ctx).await?;
        let mut workspace = self.store.owned_workspace(&owner, workspace_id).await?;

        if let Some(title) = req.title {
            workspace.title = title;
        }
        if let Some(workspace_type) = req.workspace_type {
            workspace.workspace_type = workspace_type;
        }
        if let Some(structure) = req.structure {
            workspace.structure = Some(structure);
        }
        workspace.updated_at = Utc::now();

        let workspace = self.store.workspaces.update(&workspace).await?;
        info!(owner = %owner, workspace_id = %workspace.id, "Workspace updated");
        Ok(workspace)
    }

    /// Permanently deletes a workspace record.
    ///
    /// Folders and documents of the workspace are left in place.
    pub async fn delete_workspace(
        &self,
        ctx: &RequestContext,
        workspace_id: WorkspaceId,
    ) -> AppResult<()> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_workspace(&owner, workspace_id).await?;

        let remaining = self
            .store
            .folders
            .find(&FolderFilter::default().in_workspace(workspace_id))
            .await?
            .len();
        if remaining > 0 {
            warn!(
                workspace_id = %workspace_id,
                folders = remaining,
                "Deleting workspace that still has folders"
            );
        }

        self.store.workspaces.delete(workspace_id).await?;
        info!(owner = %owner, workspace_id = %workspace_id, "Workspace deleted");
        Ok(())
    }
}
