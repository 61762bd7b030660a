//! Ownership resolution from caller identity to owner key.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{CallerId, OwnerKey};

/// Maps an authenticated caller identity to the stable owner key all
/// ownership checks compare against.
#[async_trait]
pub trait OwnerResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve the caller's owner key. Fails with `NotFound` when the
    /// caller has none.
    async fn resolve_owner_key(&self, caller: &CallerId) -> AppResult<OwnerKey>;
}
