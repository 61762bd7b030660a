//! Document CRUD, moves, content reads and the document recycle bin.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::ByteStream;
use docvault_core::types::{DocumentId, FolderId, WorkspaceId};
use docvault_database::{DocumentFilter, FolderScope};
use docvault_entity::SoftDelete;
use docvault_entity::document::{Document, DocumentType};
use docvault_entity::folder::WorkspaceStructure;

use crate::context::RequestContext;
use crate::folder::TreeService;
use crate::store::ContentStore;
use crate::validation::validate_name;

/// Request to create a document with inline content.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    /// Workspace the document is created in.
    pub workspace_id: WorkspaceId,
    /// Folder to file the document in.
    pub folder_id: Option<FolderId>,
    /// Document name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Content category.
    pub doc_type: DocumentType,
    /// Inline structured content.
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update of a document. Unset fields are left unchanged.
///
/// `folder_id: Some(None)` takes the document out of its folder.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentRequest {
    /// New name.
    pub name: Option<String>,
    /// New content category.
    pub doc_type: Option<DocumentType>,
    /// New inline content.
    pub content: Option<serde_json::Value>,
    /// New tags.
    pub tags: Option<Vec<String>>,
    /// New folder.
    pub folder_id: Option<Option<FolderId>>,
}

/// Manages documents and their recycle-bin lifecycle.
#[derive(Debug, Clone)]
pub struct DocumentService {
    store: ContentStore,
    tree: TreeService,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(store: ContentStore, tree: TreeService) -> Self {
        Self { store, tree }
    }

    pub(crate) fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Creates a document with inline content at version 1.
    pub async fn create_document(
        &self,
        ctx: &RequestContext,
        req: CreateDocumentRequest,
    ) -> AppResult<Document> {
        req.validate()?;
        validate_name("Document", &req.name)?;
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_workspace(&owner, req.workspace_id).await?;
        if let Some(folder_id) = req.folder_id {
            self.store
                .placement_folder(&owner, req.workspace_id, folder_id)
                .await?;
        }

        let mut document = Document::new(
            req.workspace_id,
            req.folder_id,
            owner,
            req.name,
            req.doc_type,
        );
        document.content = req.content;
        document.metadata.tags = req.tags;
        let document = self.store.documents.insert(&document).await?;

        info!(
            owner = %document.owner_key,
            document_id = %document.id,
            name = %document.name,
            "Document created"
        );
        Ok(document)
    }

    /// Gets a document by ID, in any lifecycle state.
    pub async fn get_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<Document> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_document(&owner, document_id).await
    }

    /// Lists all of the caller's live documents, most recently updated first.
    pub async fn list_documents(&self, ctx: &RequestContext) -> AppResult<Vec<Document>> {
        let owner = self.store.owner_of(ctx).await?;
        let mut documents = self
            .store
            .documents
            .find(&DocumentFilter::live(owner))
            .await?;
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(documents)
    }

    /// Lists the caller's live documents of one workspace, optionally
    /// narrowed by type and name substring.
    pub async fn list_workspace_documents(
        &self,
        ctx: &RequestContext,
        workspace_id: WorkspaceId,
        doc_type: Option<DocumentType>,
        name: Option<&str>,
    ) -> AppResult<Vec<Document>> {
        let owner = self.store.owner_of(ctx).await?;
        self.store.owned_workspace(&owner, workspace_id).await?;
        let filter = DocumentFilter {
            workspace_id: Some(workspace_id),
            doc_type,
            name_contains: name.filter(|n| !n.is_empty()).map(str::to_string),
            ..DocumentFilter::live(owner)
        };
        let mut documents = self.store.documents.find(&filter).await?;
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(documents)
    }

    /// Updates name, type, inline content, tags and/or folder. A folder
    /// change is validated like creation.
    pub async fn update_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        req: UpdateDocumentRequest,
    ) -> AppResult<Document> {
        let owner = self.store.owner_of(ctx).await?;
        let mut document = self.store.owned_document(&owner, document_id).await?;
        document.ensure_live()?;

        if let Some(name) = &req.name {
            validate_name("Document", name)?;
        }
        if let Some(Some(folder_id)) = req.folder_id {
            self.store
                .placement_folder(&owner, document.workspace_id, folder_id)
                .await?;
        }

        if let Some(name) = req.name {
            document.name = name;
        }
        if let Some(doc_type) = req.doc_type {
            document.doc_type = doc_type;
        }
        if let Some(content) = req.content {
            document.content = Some(content);
        }
        if let Some(tags) = req.tags {
            document.metadata.tags = tags;
        }
        if let Some(folder_id) = req.folder_id {
            document.folder_id = folder_id;
        }
        document.updated_at = Utc::now();

        let document = self.store.documents.update(&document).await?;
        info!(owner = %owner, document_id = %document.id, "Document updated");
        Ok(document)
    }

    /// Moves a document into `target_folder_id`, or out of any folder.
    pub async fn move_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        target_folder_id: Option<FolderId>,
    ) -> AppResult<Document> {
        self.update_document(
            ctx,
            document_id,
            UpdateDocumentRequest {
                folder_id: Some(target_folder_id),
                ..UpdateDocumentRequest::default()
            },
        )
        .await
    }

    /// Moves a document to the recycle bin.
    pub async fn delete_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<()> {
        let owner = self.store.owner_of(ctx).await?;
        let mut document = self.store.owned_document(&owner, document_id).await?;
        document.ensure_live()?;

        document.mark_deleted(Utc::now());
        self.store.documents.update(&document).await?;
        info!(owner = %owner, document_id = %document_id, "Document moved to recycle bin");
        Ok(())
    }

    /// Restores a document from the recycle bin. Its folder, if any, must
    /// exist and be live.
    pub async fn restore_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<Document> {
        let owner = self.store.owner_of(ctx).await?;
        let mut document = self.store.owned_document(&owner, document_id).await?;
        document.ensure_deleted()?;

        if let Some(folder_id) = document.folder_id {
            let live = self
                .store
                .folders
                .find_by_id(folder_id)
                .await?
                .is_some_and(|folder| !folder.is_deleted());
            if !live {
                return Err(AppError::conflict(
                    "Cannot restore document: its folder is missing or in the recycle bin",
                ));
            }
        }

        document.mark_restored();
        let document = self.store.documents.update(&document).await?;
        info!(owner = %owner, document_id = %document.id, "Document restored");
        Ok(document)
    }

    /// Permanently removes a soft-deleted document and every blob it
    /// references.
    pub async fn permanently_delete_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<()> {
        let owner = self.store.owner_of(ctx).await?;
        let document = self.store.owned_document(&owner, document_id).await?;
        document.ensure_deleted()?;

        self.store.purge_blobs(&document.blob_handles()).await;
        self.store.documents.delete(document.id).await?;
        info!(owner = %owner, document_id = %document_id, "Document permanently deleted");
        Ok(())
    }

    /// Permanently removes the caller's soft-deleted documents, optionally
    /// limited to a workspace and/or folder. Returns the number of records
    /// removed.
    pub async fn empty_recycle_bin(
        &self,
        ctx: &RequestContext,
        workspace_id: Option<WorkspaceId>,
        folder_id: Option<FolderId>,
    ) -> AppResult<u64> {
        let owner = self.store.owner_of(ctx).await?;
        let filter = DocumentFilter {
            workspace_id,
            folder: folder_id.map(FolderScope::In).unwrap_or_default(),
            ..DocumentFilter::deleted(owner.clone())
        };
        let documents = self.store.documents.find(&filter).await?;

        for document in &documents {
            self.store.purge_blobs(&document.blob_handles()).await;
        }
        let ids: Vec<DocumentId> = documents.iter().map(|d| d.id).collect();
        let removed = self.store.documents.delete_many(&ids).await?;

        info!(owner = %owner, removed, "Recycle bin emptied");
        Ok(removed)
    }

    /// The live folder tree of a workspace with each folder's live
    /// documents, plus the documents outside any folder.
    pub async fn get_documents_with_folder_structure(
        &self,
        ctx: &RequestContext,
        workspace_id: WorkspaceId,
    ) -> AppResult<WorkspaceStructure> {
        self.tree.get_workspace_structure(ctx, workspace_id).await
    }

    /// Opens the current binary content of a document as a stream, with the
    /// document name.
    pub async fn open_document_stream(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<(String, ByteStream)> {
        let owner = self.store.owner_of(ctx).await?;
        let document = self.store.owned_document(&owner, document_id).await?;
        let handle = document
            .file_path
            .as_ref()
            .ok_or_else(|| AppError::not_found("Document has no binary content"))?;

        let stream = self.store.blobs.read(handle).await?;
        debug!(document_id = %document_id, blob = %handle, "Opened document stream");
        Ok((document.name, stream))
    }

    /// Reads the current binary content of a document as base64.
    pub async fn read_document_base64(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<String> {
        let owner = self.store.owner_of(ctx).await?;
        let document = self.store.owned_document(&owner, document_id).await?;
        let handle = document
            .file_path
            .as_ref()
            .ok_or_else(|| AppError::not_found("Document has no binary content"))?;

        let data = self.store.blobs.read_bytes(handle).await?;
        Ok(STANDARD.encode(&data))
    }
}
