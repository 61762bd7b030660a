//! Workspace repository.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::result::AppResult;
use docvault_core::types::{OwnerKey, WorkspaceId};
use docvault_entity::workspace::Workspace;

use super::db_error;

/// Persistence for workspace records.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a workspace by ID.
    async fn find_by_id(&self, id: WorkspaceId) -> AppResult<Option<Workspace>>;

    /// List every workspace owned by `owner_key`.
    async fn find_by_owner(&self, owner_key: &OwnerKey) -> AppResult<Vec<Workspace>>;

    /// Insert a new workspace.
    async fn insert(&self, workspace: &Workspace) -> AppResult<Workspace>;

    /// Overwrite an existing workspace.
    async fn update(&self, workspace: &Workspace) -> AppResult<Workspace>;

    /// Permanently delete a workspace. Returns `true` if a row was removed.
    async fn delete(&self, id: WorkspaceId) -> AppResult<bool>;
}

/// PostgreSQL workspace repository.
#[derive(Debug, Clone)]
pub struct PgWorkspaceRepository {
    pool: PgPool,
}

impl PgWorkspaceRepository {
    /// Create a new workspace repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceRepository for PgWorkspaceRepository {
    async fn find_by_id(&self, id: WorkspaceId) -> AppResult<Option<Workspace>> {
        sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find workspace"))
    }

    async fn find_by_owner(&self, owner_key: &OwnerKey) -> AppResult<Vec<Workspace>> {
        sqlx::query_as::<_, Workspace>(
            "SELECT * FROM workspaces WHERE owner_key = $1 ORDER BY created_at DESC",
        )
        .bind(owner_key)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list workspaces"))
    }

    async fn insert(&self, workspace: &Workspace) -> AppResult<Workspace> {
        sqlx::query_as::<_, Workspace>(
            "INSERT INTO workspaces (id, owner_key, title, workspace_type, structure, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(workspace.id)
        .bind(&workspace.owner_key)
        .bind(&workspace.title)
        .bind(&workspace.workspace_type)
        .bind(&workspace.structure)
        .bind(workspace.created_at)
        .bind(workspace.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create workspace"))
    }

    async fn update(&self, workspace: &Workspace) -> AppResult<Workspace> {
        sqlx::query_as::<_, Workspace>(
            "UPDATE workspaces SET title = $2, workspace_type = $3, structure = $4, updated_at = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(workspace.id)
        .bind(&workspace.title)
        .bind(&workspace.workspace_type)
        .bind(&workspace.structure)
        .bind(workspace.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update workspace"))?
        .ok_or_else(|| {
            docvault_core::AppError::not_found(format!("Workspace {} not found", workspace.id))
        })
    }

    async fn delete(&self, id: WorkspaceId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete workspace"))?;
        Ok(result.rows_affected() > 0)
    }
}
