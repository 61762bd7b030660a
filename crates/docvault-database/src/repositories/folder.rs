//! Folder repository.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FolderId, OwnerKey, WorkspaceId};
use docvault_entity::folder::Folder;

use super::{db_error, name_contains};

/// Which parent a folder query is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParentScope {
    /// Any parent, including the workspace root.
    #[default]
    Any,
    /// Only workspace-root folders.
    Root,
    /// Only direct children of the given folder.
    Folder(FolderId),
}

impl ParentScope {
    /// Scope for the direct children of `parent` (`None` = root).
    pub fn children_of(parent: Option<FolderId>) -> Self {
        match parent {
            Some(id) => Self::Folder(id),
            None => Self::Root,
        }
    }
}

/// Criteria for listing folders. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct FolderFilter {
    /// Restrict to this owner.
    pub owner_key: Option<OwnerKey>,
    /// Restrict to this workspace.
    pub workspace_id: Option<WorkspaceId>,
    /// Restrict by parent.
    pub parent: ParentScope,
    /// Restrict by lifecycle state.
    pub deleted: Option<bool>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
}

impl FolderFilter {
    /// Live folders of `owner_key`.
    pub fn live(owner_key: OwnerKey) -> Self {
        Self {
            owner_key: Some(owner_key),
            deleted: Some(false),
            ..Self::default()
        }
    }

    /// Every folder directly under `parent`, in any state.
    pub fn children_of(parent: FolderId) -> Self {
        Self {
            parent: ParentScope::Folder(parent),
            ..Self::default()
        }
    }

    /// Restrict to a workspace.
    pub fn in_workspace(mut self, workspace_id: WorkspaceId) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }

    /// Whether `folder` satisfies every set criterion.
    pub fn matches(&self, folder: &Folder) -> bool {
        if self.owner_key.as_ref().is_some_and(|o| o != &folder.owner_key) {
            return false;
        }
        if self.workspace_id.is_some_and(|w| w != folder.workspace_id) {
            return false;
        }
        let parent_ok = match self.parent {
            ParentScope::Any => true,
            ParentScope::Root => folder.parent_folder_id.is_none(),
            ParentScope::Folder(id) => folder.parent_folder_id == Some(id),
        };
        if !parent_ok {
            return false;
        }
        if self.deleted.is_some_and(|d| d != folder.deleted) {
            return false;
        }
        match &self.name_contains {
            Some(needle) => name_contains(&folder.name, needle),
            None => true,
        }
    }
}

/// Persistence for folder records.
#[async_trait]
pub trait FolderRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID, in any state.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// List folders matching `filter`, ordered by name.
    async fn find(&self, filter: &FolderFilter) -> AppResult<Vec<Folder>>;

    /// Find the live folder named `name` directly under `parent` in
    /// `workspace_id`.
    async fn find_live_sibling(
        &self,
        workspace_id: WorkspaceId,
        parent: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<Folder>>;

    /// Insert a new folder.
    async fn insert(&self, folder: &Folder) -> AppResult<Folder>;

    /// Overwrite every mutable column of an existing folder.
    async fn update(&self, folder: &Folder) -> AppResult<Folder>;

    /// Permanently delete a folder record. Returns `true` if a row was removed.
    async fn delete(&self, id: FolderId) -> AppResult<bool>;
}

/// PostgreSQL folder repository.
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find folder"))
    }

    async fn find(&self, filter: &FolderFilter) -> AppResult<Vec<Folder>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM folders WHERE TRUE");
        if let Some(owner_key) = &filter.owner_key {
            qb.push(" AND owner_key = ").push_bind(owner_key.clone());
        }
        if let Some(workspace_id) = filter.workspace_id {
            qb.push(" AND workspace_id = ").push_bind(workspace_id);
        }
        match filter.parent {
            ParentScope::Any => {}
            ParentScope::Root => {
                qb.push(" AND parent_folder_id IS NULL");
            }
            ParentScope::Folder(parent) => {
                qb.push(" AND parent_folder_id = ").push_bind(parent);
            }
        }
        if let Some(deleted) = filter.deleted {
            qb.push(" AND deleted = ").push_bind(deleted);
        }
        if let Some(needle) = &filter.name_contains {
            qb.push(" AND strpos(lower(name), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        qb.push(" ORDER BY name ASC");

        qb.build_query_as::<Folder>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list folders"))
    }

    async fn find_live_sibling(
        &self,
        workspace_id: WorkspaceId,
        parent: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE workspace_id = $1 \
             AND parent_folder_id IS NOT DISTINCT FROM $2 \
             AND name = $3 AND deleted = FALSE LIMIT 1",
        )
        .bind(workspace_id)
        .bind(parent)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to check sibling folder names"))
    }

    async fn insert(&self, folder: &Folder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, workspace_id, parent_folder_id, owner_key, name, description, \
             path, metadata, deleted, deleted_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(folder.id)
        .bind(folder.workspace_id)
        .bind(folder.parent_folder_id)
        .bind(&folder.owner_key)
        .bind(&folder.name)
        .bind(&folder.description)
        .bind(&folder.path)
        .bind(Json(&folder.metadata))
        .bind(folder.deleted)
        .bind(folder.deleted_at)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create folder"))
    }

    async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_folder_id = $2, name = $3, description = $4, path = $5, \
             metadata = $6, deleted = $7, deleted_at = $8, updated_at = $9 \
             WHERE id = $1 RETURNING *",
        )
        .bind(folder.id)
        .bind(folder.parent_folder_id)
        .bind(&folder.name)
        .bind(&folder.description)
        .bind(&folder.path)
        .bind(Json(&folder.metadata))
        .bind(folder.deleted)
        .bind(folder.deleted_at)
        .bind(folder.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {} not found", folder.id)))
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete folder"))?;
        Ok(result.rows_affected() > 0)
    }
}
