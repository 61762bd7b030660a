//! Version ledger entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docvault_core::types::{BlobId, DocumentVersionId, OwnerKey};

/// A prior content state of a document. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    /// Unique entry identifier.
    pub id: DocumentVersionId,
    /// Version number the document had in this state.
    pub version: i32,
    /// When this state was uploaded.
    pub uploaded_at: DateTime<Utc>,
    /// Owner key of the uploader.
    pub uploaded_by: OwnerKey,
    /// Blob handle of the content, if the state had binary content.
    pub file_path: Option<BlobId>,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Optional comment describing the change.
    pub change_note: Option<String>,
}
