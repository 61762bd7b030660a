//! Document repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, OwnerKey, WorkspaceId};
use docvault_entity::document::{Document, DocumentType};

use super::{db_error, name_contains};

/// Which folder a document query is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FolderScope {
    /// Any folder, or none.
    #[default]
    Any,
    /// Only documents without a folder.
    Unfiled,
    /// Only documents directly inside the given folder.
    In(FolderId),
    /// Only documents directly inside one of the given folders.
    AnyOf(Vec<FolderId>),
}

/// Criteria for listing documents. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Restrict to this owner.
    pub owner_key: Option<OwnerKey>,
    /// Restrict to this workspace.
    pub workspace_id: Option<WorkspaceId>,
    /// Restrict by folder.
    pub folder: FolderScope,
    /// Restrict by lifecycle state.
    pub deleted: Option<bool>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
    /// Restrict to one content category.
    pub doc_type: Option<DocumentType>,
    /// Only documents updated at or after this instant.
    pub updated_since: Option<DateTime<Utc>>,
    /// Only documents deleted at or after this instant.
    pub deleted_since: Option<DateTime<Utc>>,
}

impl DocumentFilter {
    /// Live documents of `owner_key`.
    pub fn live(owner_key: OwnerKey) -> Self {
        Self {
            owner_key: Some(owner_key),
            deleted: Some(false),
            ..Self::default()
        }
    }

    /// Soft-deleted documents of `owner_key`.
    pub fn deleted(owner_key: OwnerKey) -> Self {
        Self {
            owner_key: Some(owner_key),
            deleted: Some(true),
            ..Self::default()
        }
    }

    /// Whether `document` satisfies every set criterion.
    pub fn matches(&self, document: &Document) -> bool {
        if self.owner_key.as_ref().is_some_and(|o| o != &document.owner_key) {
            return false;
        }
        if self.workspace_id.is_some_and(|w| w != document.workspace_id) {
            return false;
        }
        let folder_ok = match &self.folder {
            FolderScope::Any => true,
            FolderScope::Unfiled => document.folder_id.is_none(),
            FolderScope::In(id) => document.folder_id == Some(*id),
            FolderScope::AnyOf(ids) => document.folder_id.is_some_and(|f| ids.contains(&f)),
        };
        if !folder_ok {
            return false;
        }
        if self.deleted.is_some_and(|d| d != document.deleted) {
            return false;
        }
        if self.doc_type.is_some_and(|t| t != document.doc_type) {
            return false;
        }
        if self.updated_since.is_some_and(|since| document.updated_at < since) {
            return false;
        }
        if let Some(since) = self.deleted_since {
            if document.deleted_at.is_none_or(|at| at < since) {
                return false;
            }
        }
        match &self.name_contains {
            Some(needle) => name_contains(&document.name, needle),
            None => true,
        }
    }
}

/// Persistence for document records and their embedded version ledgers.
#[async_trait]
pub trait DocumentRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a document by ID, in any state.
    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>>;

    /// List documents matching `filter`, most recently updated first.
    async fn find(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>>;

    /// Find the live document named `name` in `folder_id` of `workspace_id`.
    async fn find_live_by_name(
        &self,
        workspace_id: WorkspaceId,
        folder_id: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<Document>>;

    /// Count live documents directly inside each of `folder_ids`. Folders
    /// without documents are absent from the map.
    async fn count_live_by_folder(&self, folder_ids: &[FolderId])
    -> AppResult<HashMap<FolderId, u64>>;

    /// Insert a new document.
    async fn insert(&self, document: &Document) -> AppResult<Document>;

    /// Overwrite every mutable column of an existing document.
    async fn update(&self, document: &Document) -> AppResult<Document>;

    /// Soft-delete every live document directly inside `folder_id`,
    /// stamping `deleted_at = at`. Returns the number of documents changed.
    async fn soft_delete_live_in_folder(&self, folder_id: FolderId, at: DateTime<Utc>)
    -> AppResult<u64>;

    /// Permanently delete a document record.
    async fn delete(&self, id: DocumentId) -> AppResult<bool>;

    /// Permanently delete several document records. Returns the number removed.
    async fn delete_many(&self, ids: &[DocumentId]) -> AppResult<u64>;
}

/// PostgreSQL document repository.
#[derive(Debug, Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn folder_uuids(ids: &[FolderId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.into_uuid()).collect()
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find document"))
    }

    async fn find(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM documents WHERE TRUE");
        if let Some(owner_key) = &filter.owner_key {
            qb.push(" AND owner_key = ").push_bind(owner_key.clone());
        }
        if let Some(workspace_id) = filter.workspace_id {
            qb.push(" AND workspace_id = ").push_bind(workspace_id);
        }
        match &filter.folder {
            FolderScope::Any => {}
            FolderScope::Unfiled => {
                qb.push(" AND folder_id IS NULL");
            }
            FolderScope::In(folder_id) => {
                qb.push(" AND folder_id = ").push_bind(*folder_id);
            }
            FolderScope::AnyOf(ids) => {
                qb.push(" AND folder_id = ANY(")
                    .push_bind(folder_uuids(ids))
                    .push(")");
            }
        }
        if let Some(deleted) = filter.deleted {
            qb.push(" AND deleted = ").push_bind(deleted);
        }
        if let Some(doc_type) = filter.doc_type {
            qb.push(" AND doc_type = ").push_bind(doc_type);
        }
        if let Some(since) = filter.updated_since {
            qb.push(" AND updated_at >= ").push_bind(since);
        }
        if let Some(since) = filter.deleted_since {
            qb.push(" AND deleted_at >= ").push_bind(since);
        }
        if let Some(needle) = &filter.name_contains {
            qb.push(" AND strpos(lower(name), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        qb.push(" ORDER BY updated_at DESC");

        qb.build_query_as::<Document>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list documents"))
    }

    async fn find_live_by_name(
        &self,
        workspace_id: WorkspaceId,
        folder_id: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE workspace_id = $1 \
             AND folder_id IS NOT DISTINCT FROM $2 \
             AND name = $3 AND deleted = FALSE \
             ORDER BY created_at ASC LIMIT 1",
        )
        .bind(workspace_id)
        .bind(folder_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find document by name"))
    }

    async fn count_live_by_folder(
        &self,
        folder_ids: &[FolderId],
    ) -> AppResult<HashMap<FolderId, u64>> {
        if folder_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(FolderId, i64)> = sqlx::query_as(
            "SELECT folder_id, COUNT(*) FROM documents \
             WHERE folder_id = ANY($1) AND deleted = FALSE GROUP BY folder_id",
        )
        .bind(folder_uuids(folder_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to count documents"))?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }

    async fn insert(&self, document: &Document) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, workspace_id, folder_id, owner_key, name, doc_type, metadata, \
             content, file_path, deleted, deleted_at, versions, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *",
        )
        .bind(document.id)
        .bind(document.workspace_id)
        .bind(document.folder_id)
        .bind(&document.owner_key)
        .bind(&document.name)
        .bind(document.doc_type)
        .bind(Json(&document.metadata))
        .bind(&document.content)
        .bind(&document.file_path)
        .bind(document.deleted)
        .bind(document.deleted_at)
        .bind(Json(&document.versions))
        .bind(document.created_at)
        .bind(document.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create document"))
    }

    async fn update(&self, document: &Document) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET folder_id = $2, name = $3, doc_type = $4, metadata = $5, \
             content = $6, file_path = $7, deleted = $8, deleted_at = $9, versions = $10, \
             updated_at = $11 WHERE id = $1 RETURNING *",
        )
        .bind(document.id)
        .bind(document.folder_id)
        .bind(&document.name)
        .bind(document.doc_type)
        .bind(Json(&document.metadata))
        .bind(&document.content)
        .bind(&document.file_path)
        .bind(document.deleted)
        .bind(document.deleted_at)
        .bind(Json(&document.versions))
        .bind(document.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update document"))?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", document.id)))
    }

    async fn soft_delete_live_in_folder(
        &self,
        folder_id: FolderId,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE documents SET deleted = TRUE, deleted_at = $2, updated_at = $2 \
             WHERE folder_id = $1 AND deleted = FALSE",
        )
        .bind(folder_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to delete folder documents"))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: DocumentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete document"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[DocumentId]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let result = sqlx::query("DELETE FROM documents WHERE id = ANY($1)")
            .bind(uuids)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete documents"))?;
        Ok(result.rows_affected())
    }
}
