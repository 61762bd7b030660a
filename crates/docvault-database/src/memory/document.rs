//! In-memory document repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, WorkspaceId};
use docvault_entity::SoftDelete;
use docvault_entity::document::Document;

use crate::repositories::{DocumentFilter, DocumentRepository};

/// Document repository holding records in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryDocumentRepository {
    records: DashMap<DocumentId, Document>,
}

impl MemoryDocumentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>> {
        let mut documents: Vec<Document> = self
            .records
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(documents)
    }

    async fn find_live_by_name(
        &self,
        workspace_id: WorkspaceId,
        folder_id: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<Document>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| {
                entry.workspace_id == workspace_id
                    && entry.folder_id == folder_id
                    && entry.name == name
                    && !entry.deleted
            })
            .min_by_key(|entry| entry.created_at)
            .map(|entry| entry.value().clone()))
    }

    async fn count_live_by_folder(
        &self,
        folder_ids: &[FolderId],
    ) -> AppResult<HashMap<FolderId, u64>> {
        let mut counts = HashMap::new();
        for entry in self.records.iter() {
            if entry.deleted {
                continue;
            }
            if let Some(folder_id) = entry.folder_id {
                if folder_ids.contains(&folder_id) {
                    *counts.entry(folder_id).or_insert(0) += 1;
                }
            }
        }
        Ok(counts)
    }

    async fn insert(&self, document: &Document) -> AppResult<Document> {
        if self.records.contains_key(&document.id) {
            return Err(AppError::conflict(format!(
                "Document {} already exists",
                document.id
            )));
        }
        self.records.insert(document.id, document.clone());
        Ok(document.clone())
    }

    async fn update(&self, document: &Document) -> AppResult<Document> {
        match self.records.get_mut(&document.id) {
            Some(mut entry) => {
                *entry = document.clone();
                Ok(document.clone())
            }
            None => Err(AppError::not_found(format!(
                "Document {} not found",
                document.id
            ))),
        }
    }

    async fn soft_delete_live_in_folder(
        &self,
        folder_id: FolderId,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut changed = 0;
        for mut entry in self.records.iter_mut() {
            if entry.folder_id == Some(folder_id) && !entry.deleted {
                entry.mark_deleted(at);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, id: DocumentId) -> AppResult<bool> {
        Ok(self.records.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[DocumentId]) -> AppResult<u64> {
        Ok(ids
            .iter()
            .filter(|id| self.records.remove(id).is_some())
            .count() as u64)
    }
}
