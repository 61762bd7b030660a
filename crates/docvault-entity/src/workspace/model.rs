//! Workspace entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{OwnerKey, WorkspaceId};

/// A workspace: the top-level container of a folder tree and documents.
///
/// Workspaces have no recycle bin; deletion is permanent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    /// Unique workspace identifier.
    pub id: WorkspaceId,
    /// Owner of the workspace.
    pub owner_key: OwnerKey,
    /// Display title.
    pub title: String,
    /// Free-form workspace type label.
    pub workspace_type: String,
    /// Free-form structure blob.
    pub structure: Option<serde_json::Value>,
    /// When the workspace was created.
    pub created_at: DateTime<Utc>,
    /// When the workspace was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Build a new workspace record owned by `owner_key`.
    pub fn new(
        owner_key: OwnerKey,
        title: String,
        workspace_type: String,
        structure: Option<serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: WorkspaceId::new(),
            owner_key,
            title,
            workspace_type,
            structure,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether `owner_key` owns this workspace.
    pub fn is_owned_by(&self, owner_key: &OwnerKey) -> bool {
        &self.owner_key == owner_key
    }
}
