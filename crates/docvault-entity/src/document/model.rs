//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{BlobId, DocumentId, DocumentVersionId, FolderId, OwnerKey, WorkspaceId};

use super::kind::DocumentType;
use super::metadata::DocumentMetadata;
use super::version::DocumentVersion;

/// A document: inline structured content or an uploaded blob, plus its
/// version ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Workspace the document belongs to.
    pub workspace_id: WorkspaceId,
    /// Folder containing the document, if filed.
    pub folder_id: Option<FolderId>,
    /// The document owner.
    pub owner_key: OwnerKey,
    /// Document name (including extension for uploads).
    pub name: String,
    /// Content category.
    pub doc_type: DocumentType,
    /// Version counter, size, MIME type, tags.
    #[sqlx(json)]
    pub metadata: DocumentMetadata,
    /// Inline structured content.
    pub content: Option<serde_json::Value>,
    /// Blob handle of the current binary content.
    pub file_path: Option<BlobId>,
    /// Whether the document is in the recycle bin.
    pub deleted: bool,
    /// When the document was moved to the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Prior content states, in append order.
    #[sqlx(json)]
    pub versions: Vec<DocumentVersion>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

crate::lifecycle::impl_soft_delete!(Document, "Document");

impl Document {
    /// Build a new live document at version 1 with no history.
    pub fn new(
        workspace_id: WorkspaceId,
        folder_id: Option<FolderId>,
        owner_key: OwnerKey,
        name: String,
        doc_type: DocumentType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            workspace_id,
            folder_id,
            owner_key,
            name,
            doc_type,
            metadata: DocumentMetadata {
                content_uploaded_at: Some(now),
                ..DocumentMetadata::default()
            },
            content: None,
            file_path: None,
            deleted: false,
            deleted_at: None,
            versions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether `owner_key` owns this document.
    pub fn is_owned_by(&self, owner_key: &OwnerKey) -> bool {
        &self.owner_key == owner_key
    }

    /// Current version number.
    pub fn version(&self) -> i32 {
        self.metadata.version
    }

    /// When the current content was uploaded. Rows written before the
    /// timestamp was tracked fall back to the creation time.
    pub fn content_uploaded_at(&self) -> DateTime<Utc> {
        self.metadata.content_uploaded_at.unwrap_or(self.created_at)
    }

    /// Snapshot the current content state as a ledger entry.
    pub fn snapshot(&self, uploaded_by: OwnerKey, change_note: Option<String>) -> DocumentVersion {
        DocumentVersion {
            id: DocumentVersionId::new(),
            version: self.metadata.version,
            uploaded_at: self.content_uploaded_at(),
            uploaded_by,
            file_path: self.file_path.clone(),
            size: self.metadata.size,
            mime_type: self.metadata.mime_type.clone(),
            change_note,
        }
    }

    /// Push the current state onto the ledger and replace the binary
    /// content, bumping the version counter.
    pub fn replace_content(
        &mut self,
        snapshot: DocumentVersion,
        file_path: Option<BlobId>,
        size: i64,
        mime_type: Option<String>,
    ) {
        self.versions.push(snapshot);
        self.file_path = file_path;
        self.metadata.size = size;
        self.metadata.mime_type = mime_type;
        self.metadata.version += 1;
        let now = Utc::now();
        self.metadata.content_uploaded_at = Some(now);
        self.updated_at = now;
    }

    /// Find a ledger entry by id.
    pub fn find_version(&self, version_id: DocumentVersionId) -> Option<&DocumentVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }

    /// Whether the current state or any ledger entry references `blob`.
    pub fn references_blob(&self, blob: &BlobId) -> bool {
        self.file_path.as_ref() == Some(blob)
            || self
                .versions
                .iter()
                .any(|v| v.file_path.as_ref() == Some(blob))
    }

    /// Every distinct blob handle referenced by the current state and the
    /// ledger.
    pub fn blob_handles(&self) -> Vec<BlobId> {
        let mut handles: Vec<BlobId> = Vec::new();
        let all = self
            .file_path
            .iter()
            .chain(self.versions.iter().filter_map(|v| v.file_path.as_ref()));
        for handle in all {
            if !handles.contains(handle) {
                handles.push(handle.clone());
            }
        }
        handles
    }
}
