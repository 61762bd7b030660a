//! # docvault-storage
//!
//! Blob store implementations for DocVault: a local filesystem store and an
//! in-memory store, plus construction from [`StorageConfig`].
//!
//! [`StorageConfig`]: docvault_core::config::StorageConfig

pub mod factory;
pub mod providers;

pub use factory::build_blob_store;
pub use providers::local::LocalBlobStore;
pub use providers::memory::MemoryBlobStore;
