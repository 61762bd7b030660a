//! Blob store construction from configuration.

use std::sync::Arc;

use tracing::info;

use docvault_core::config::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::BlobStore;

use crate::providers::memory::MemoryBlobStore;

/// Build the blob store named by `config.provider`.
pub async fn build_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.provider.as_str() {
        #[cfg(feature = "local")]
        "local" => Arc::new(
            crate::providers::local::LocalBlobStore::new(&config.local.root_path).await?,
        ),
        "memory" => Arc::new(MemoryBlobStore::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider: {other}"
            )));
        }
    };
    info!(provider = store.provider_type(), "Blob store ready");
    Ok(store)
}
