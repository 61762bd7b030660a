//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{FolderId, OwnerKey, WorkspaceId};

use super::metadata::FolderMetadata;

/// Separator between names in a materialized path.
pub const PATH_SEPARATOR: char = '/';

/// A folder in a workspace's folder tree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Workspace the folder belongs to. Never changes.
    pub workspace_id: WorkspaceId,
    /// Parent folder ID (None for workspace-root folders).
    pub parent_folder_id: Option<FolderId>,
    /// The folder owner.
    pub owner_key: OwnerKey,
    /// Folder name, unique among live siblings.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Full materialized path (e.g., `/Docs/2024`).
    pub path: String,
    /// Presentation and sharing metadata.
    #[sqlx(json)]
    pub metadata: FolderMetadata,
    /// Whether the folder is in the recycle bin.
    pub deleted: bool,
    /// When the folder was moved to the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

crate::lifecycle::impl_soft_delete!(Folder, "Folder");

impl Folder {
    /// Build a new live folder record. `parent_path` is the parent's
    /// materialized path, or `None` at the workspace root.
    pub fn new(
        workspace_id: WorkspaceId,
        parent_folder_id: Option<FolderId>,
        parent_path: Option<&str>,
        owner_key: OwnerKey,
        name: String,
        description: String,
        metadata: FolderMetadata,
    ) -> Self {
        let now = Utc::now();
        let path = child_path(parent_path, &name);
        Self {
            id: FolderId::new(),
            workspace_id,
            parent_folder_id,
            owner_key,
            name,
            description,
            path,
            metadata,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is a workspace-root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    /// Check whether `owner_key` owns this folder.
    pub fn is_owned_by(&self, owner_key: &OwnerKey) -> bool {
        &self.owner_key == owner_key
    }

    /// Recompute `path` from the parent's path and the current name.
    pub fn rebase(&mut self, parent_path: Option<&str>) {
        self.path = child_path(parent_path, &self.name);
    }
}

/// Materialized path of a child named `name` under `parent_path`
/// (`None` = workspace root).
pub fn child_path(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) => format!("{parent}{PATH_SEPARATOR}{name}"),
        None => format!("{PATH_SEPARATOR}{name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::SoftDelete;

    fn folder(parent_path: Option<&str>, name: &str) -> Folder {
        Folder::new(
            WorkspaceId::new(),
            None,
            parent_path,
            OwnerKey::new("owner-1"),
            name.to_string(),
            String::new(),
            FolderMetadata::default(),
        )
    }

    #[test]
    fn test_root_path() {
        assert_eq!(folder(None, "Docs").path, "/Docs");
    }

    #[test]
    fn test_nested_path_and_rebase() {
        let mut f = folder(Some("/Docs"), "2024");
        assert_eq!(f.path, "/Docs/2024");
        f.rebase(Some("/Archive/Docs"));
        assert_eq!(f.path, "/Archive/Docs/2024");
        f.rebase(None);
        assert_eq!(f.path, "/2024");
    }

    #[test]
    fn test_soft_delete_flags_move_together() {
        let mut f = folder(None, "Docs");
        assert!(f.ensure_live().is_ok());
        assert!(f.ensure_deleted().is_err());

        let at = Utc::now();
        f.mark_deleted(at);
        assert!(f.is_deleted());
        assert_eq!(f.deleted_at(), Some(at));

        f.mark_restored();
        assert!(!f.is_deleted());
        assert!(f.deleted_at().is_none());
    }
}
