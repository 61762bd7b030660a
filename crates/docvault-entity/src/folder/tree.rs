//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use super::model::Folder;
use crate::document::Document;

/// A node of a folder tree carrying a live document count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTreeNode {
    /// The folder record.
    #[serde(flatten)]
    pub folder: Folder,
    /// Number of live documents directly inside this folder.
    pub document_count: u64,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderTreeNode>,
}

/// A node of a folder tree carrying the folder's live documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContentsNode {
    /// The folder record.
    #[serde(flatten)]
    pub folder: Folder,
    /// Live documents directly inside this folder, ordered by name.
    pub documents: Vec<Document>,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderContentsNode>,
}

/// A workspace's complete live folder tree with documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceStructure {
    /// Root-level folder nodes.
    pub folders: Vec<FolderContentsNode>,
    /// Live documents not filed in any folder.
    pub unfiled_documents: Vec<Document>,
}

impl FolderTreeNode {
    /// Total number of folders in this subtree, including this node.
    pub fn folder_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}
