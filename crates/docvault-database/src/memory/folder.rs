//! In-memory folder repository.

use async_trait::async_trait;
use dashmap::DashMap;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FolderId, WorkspaceId};
use docvault_entity::folder::Folder;

use crate::repositories::{FolderFilter, FolderRepository};

/// Folder repository holding records in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryFolderRepository {
    records: DashMap<FolderId, Folder>,
}

impl MemoryFolderRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FolderRepository for MemoryFolderRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find(&self, filter: &FolderFilter) -> AppResult<Vec<Folder>> {
        let mut folders: Vec<Folder> = self
            .records
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn find_live_sibling(
        &self,
        workspace_id: WorkspaceId,
        parent: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        Ok(self
            .records
            .iter()
            .find(|entry| {
                entry.workspace_id == workspace_id
                    && entry.parent_folder_id == parent
                    && entry.name == name
                    && !entry.deleted
            })
            .map(|entry| entry.value().clone()))
    }

    async fn insert(&self, folder: &Folder) -> AppResult<Folder> {
        if self.records.contains_key(&folder.id) {
            return Err(AppError::conflict(format!(
                "Folder {} already exists",
                folder.id
            )));
        }
        self.records.insert(folder.id, folder.clone());
        Ok(folder.clone())
    }

    async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        match self.records.get_mut(&folder.id) {
            Some(mut entry) => {
                *entry = folder.clone();
                Ok(folder.clone())
            }
            None => Err(AppError::not_found(format!(
                "Folder {} not found",
                folder.id
            ))),
        }
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        Ok(self.records.remove(&id).is_some())
    }
}
