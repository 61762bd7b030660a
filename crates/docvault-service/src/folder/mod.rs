//! Folder tree management: CRUD, moves, cascades and tree reads.

pub mod service;
pub mod tree;
pub(crate) mod walk;

pub use service::{CreateFolderRequest, FolderService, UpdateFolderRequest};
pub use tree::TreeService;
