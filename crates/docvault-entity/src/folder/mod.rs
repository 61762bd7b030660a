//! Folder domain entities.

pub mod metadata;
pub mod model;
pub mod tree;

pub use metadata::FolderMetadata;
pub use model::{Folder, PATH_SEPARATOR, child_path};
pub use tree::{FolderContentsNode, FolderTreeNode, WorkspaceStructure};
