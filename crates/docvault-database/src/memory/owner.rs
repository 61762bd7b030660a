//! In-memory owner directory.

use async_trait::async_trait;
use dashmap::DashMap;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::OwnerResolver;
use docvault_core::types::{CallerId, OwnerKey};

/// Maps caller identities to owner keys.
#[derive(Debug, Default)]
pub struct MemoryOwnerDirectory {
    keys: DashMap<CallerId, OwnerKey>,
}

impl MemoryOwnerDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `caller` to `owner_key`, replacing any existing binding.
    pub fn register(&self, caller: CallerId, owner_key: OwnerKey) {
        self.keys.insert(caller, owner_key);
    }
}

#[async_trait]
impl OwnerResolver for MemoryOwnerDirectory {
    async fn resolve_owner_key(&self, caller: &CallerId) -> AppResult<OwnerKey> {
        self.keys
            .get(caller)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("No owner key for caller {caller}")))
    }
}
