//! In-memory repository implementations backed by `DashMap`.
//!
//! Used by embedders that do not want PostgreSQL and by the service tests.
//! Each write replaces the whole record, matching the per-record write
//! semantics of the SQL repositories.

pub mod document;
pub mod folder;
pub mod owner;
pub mod workspace;

pub use document::MemoryDocumentRepository;
pub use folder::MemoryFolderRepository;
pub use owner::MemoryOwnerDirectory;
pub use workspace::MemoryWorkspaceRepository;
