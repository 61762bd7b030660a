//! Owner directory backed by the `owner_keys` table.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::OwnerResolver;
use docvault_core::types::{CallerId, OwnerKey};

use super::db_error;

/// Resolves caller identities to owner keys from PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgOwnerDirectory {
    pool: PgPool,
}

impl PgOwnerDirectory {
    /// Create a new owner directory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bind a caller identity to an owner key, replacing any existing binding.
    pub async fn register(&self, caller: CallerId, owner_key: &OwnerKey) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO owner_keys (caller_id, owner_key) VALUES ($1, $2) \
             ON CONFLICT (caller_id) DO UPDATE SET owner_key = EXCLUDED.owner_key",
        )
        .bind(caller)
        .bind(owner_key)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to register owner key"))?;
        Ok(())
    }
}

#[async_trait]
impl OwnerResolver for PgOwnerDirectory {
    async fn resolve_owner_key(&self, caller: &CallerId) -> AppResult<OwnerKey> {
        sqlx::query_scalar::<_, OwnerKey>("SELECT owner_key FROM owner_keys WHERE caller_id = $1")
            .bind(caller)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to resolve owner key"))?
            .ok_or_else(|| AppError::not_found(format!("No owner key for caller {caller}")))
    }
}
