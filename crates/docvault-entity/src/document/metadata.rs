//! Document metadata value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::AccessEntry;

/// Metadata stored as JSON alongside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Current version number; starts at 1.
    #[serde(default = "initial_version")]
    pub version: i32,
    /// Arbitrary tags for categorization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Size of the current binary content in bytes.
    #[serde(default)]
    pub size: i64,
    /// MIME type of the current binary content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// When the current content became current. Metadata edits leave it
    /// alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_uploaded_at: Option<DateTime<Utc>>,
    /// Sharing grants. Stored, never enforced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access: Vec<AccessEntry>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            version: initial_version(),
            tags: Vec::new(),
            size: 0,
            mime_type: None,
            content_uploaded_at: None,
            access: Vec::new(),
        }
    }
}

fn initial_version() -> i32 {
    1
}
