//! # docvault-database
//!
//! Repository traits for workspaces, folders, documents and the owner
//! directory, with PostgreSQL implementations on `sqlx` and in-memory
//! implementations for embedding and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{
    DocumentFilter, DocumentRepository, FolderFilter, FolderRepository, FolderScope, ParentScope,
    WorkspaceRepository,
};
