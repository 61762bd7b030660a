//! In-memory workspace repository.

use async_trait::async_trait;
use dashmap::DashMap;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{OwnerKey, WorkspaceId};
use docvault_entity::workspace::Workspace;

use crate::repositories::WorkspaceRepository;

/// Workspace repository holding records in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryWorkspaceRepository {
    records: DashMap<WorkspaceId, Workspace>,
}

impl MemoryWorkspaceRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkspaceRepository for MemoryWorkspaceRepository {
    async fn find_by_id(&self, id: WorkspaceId) -> AppResult<Option<Workspace>> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_owner(&self, owner_key: &OwnerKey) -> AppResult<Vec<Workspace>> {
        let mut workspaces: Vec<Workspace> = self
            .records
            .iter()
            .filter(|entry| entry.is_owned_by(owner_key))
            .map(|entry| entry.value().clone())
            .collect();
        workspaces.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(workspaces)
    }

    async fn insert(&self, workspace: &Workspace) -> AppResult<Workspace> {
        if self.records.contains_key(&workspace.id) {
            return Err(AppError::conflict(format!(
                "Workspace {} already exists",
                workspace.id
            )));
        }
        self.records.insert(workspace.id, workspace.clone());
        Ok(workspace.clone())
    }

    async fn update(&self, workspace: &Workspace) -> AppResult<Workspace> {
        match self.records.get_mut(&workspace.id) {
            Some(mut entry) => {
                *entry = workspace.clone();
                Ok(workspace.clone())
            }
            None => Err(AppError::not_found(format!(
                "Workspace {} not found",
                workspace.id
            ))),
        }
    }

    async fn delete(&self, id: WorkspaceId) -> AppResult<bool> {
        Ok(self.records.remove(&id).is_some())
    }
}
