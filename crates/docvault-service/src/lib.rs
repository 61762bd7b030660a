//! # docvault-service
//!
//! Business logic service layer for DocVault. Each service orchestrates the
//! repositories, the blob store and the owner resolver to implement one
//! group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time through a shared [`ContentStore`].

pub mod context;
pub mod document;
pub mod folder;
pub mod recycle;
pub mod store;
pub mod validation;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use document::{
    DateRange, DocumentSearch, DocumentService, UploadFile, UploadRequest, UploadService,
    VersionService,
};
pub use folder::{FolderService, TreeService};
pub use recycle::{RecycleBinContents, RecycleBinService};
pub use store::ContentStore;
pub use workspace::WorkspaceService;
