//! Repository traits and their PostgreSQL implementations.
//!
//! Each trait is the persistence seam for one collection. Services hold
//! `Arc<dyn ...Repository>` so the PostgreSQL implementations here and the
//! in-memory ones in [`crate::memory`] are interchangeable.

pub mod document;
pub mod folder;
pub mod owner;
pub mod workspace;

pub use document::{DocumentFilter, DocumentRepository, FolderScope, PgDocumentRepository};
pub use folder::{FolderFilter, FolderRepository, ParentScope, PgFolderRepository};
pub use owner::PgOwnerDirectory;
pub use workspace::{PgWorkspaceRepository, WorkspaceRepository};

use docvault_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error as a database [`AppError`].
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Case-insensitive substring match used by in-memory name filters.
pub(crate) fn name_contains(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.to_lowercase())
}
