//! Folder metadata value object.

use serde::{Deserialize, Serialize};

use crate::access::AccessEntry;

/// Presentation and sharing metadata stored as JSON alongside a folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderMetadata {
    /// Display color (e.g. `#3366ff`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Arbitrary tags for categorization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Sharing grants. Stored, never enforced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access: Vec<AccessEntry>,
}
