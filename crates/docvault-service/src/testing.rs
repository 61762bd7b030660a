//! Shared fixtures for service tests, wired to the in-memory repositories
//! and blob store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use docvault_core::config::{ContentConfig, StorageConfig};
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{BlobMetadata, BlobStore, ByteStream, bytes_stream};
use docvault_core::types::{BlobId, CallerId, FolderId, OwnerKey, WorkspaceId};
use docvault_database::memory::{
    MemoryDocumentRepository, MemoryFolderRepository, MemoryOwnerDirectory,
    MemoryWorkspaceRepository,
};
use docvault_entity::document::{Document, DocumentType};
use docvault_entity::folder::Folder;
use docvault_entity::workspace::Workspace;
use docvault_storage::MemoryBlobStore;

use crate::context::RequestContext;
use crate::document::{DocumentService, UploadFile, UploadRequest, UploadService, VersionService};
use crate::folder::{CreateFolderRequest, FolderService, TreeService};
use crate::recycle::RecycleBinService;
use crate::store::ContentStore;
use crate::workspace::{CreateWorkspaceRequest, WorkspaceService};

/// Stores blobs in memory but refuses every delete.
#[derive(Debug)]
pub(crate) struct UndeletableBlobStore {
    inner: Arc<MemoryBlobStore>,
}

#[async_trait]
impl BlobStore for UndeletableBlobStore {
    fn provider_type(&self) -> &str {
        "undeletable"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write(
        &self,
        name: &str,
        metadata: BlobMetadata,
        stream: ByteStream,
    ) -> AppResult<BlobId> {
        self.inner.write(name, metadata, stream).await
    }

    async fn read(&self, id: &BlobId) -> AppResult<ByteStream> {
        self.inner.read(id).await
    }

    async fn delete(&self, id: &BlobId) -> AppResult<()> {
        Err(AppError::storage(format!("Refusing to delete blob {id}")))
    }
}

pub(crate) struct Fixture {
    pub store: ContentStore,
    pub blobs: Arc<MemoryBlobStore>,
    pub owners: Arc<MemoryOwnerDirectory>,
    pub ctx: RequestContext,
    pub content: ContentConfig,
    pub storage: StorageConfig,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_storage(StorageConfig::default(), false)
    }

    pub fn with_upload_limit(limit: u64) -> Self {
        Self::with_storage(
            StorageConfig {
                max_upload_size_bytes: limit,
                ..StorageConfig::default()
            },
            false,
        )
    }

    /// A fixture whose blob store fails every delete.
    pub fn with_failing_blob_deletes() -> Self {
        Self::with_storage(StorageConfig::default(), true)
    }

    fn with_storage(storage: StorageConfig, failing_deletes: bool) -> Self {
        let blobs = Arc::new(MemoryBlobStore::new());
        let blob_store: Arc<dyn BlobStore> = if failing_deletes {
            Arc::new(UndeletableBlobStore {
                inner: blobs.clone(),
            })
        } else {
            blobs.clone()
        };
        let owners = Arc::new(MemoryOwnerDirectory::new());
        let caller = CallerId::new();
        owners.register(caller, OwnerKey::new("owner-1"));

        let store = ContentStore::new(
            Arc::new(MemoryWorkspaceRepository::new()),
            Arc::new(MemoryFolderRepository::new()),
            Arc::new(MemoryDocumentRepository::new()),
            blob_store,
            owners.clone(),
        );

        Self {
            store,
            blobs,
            owners,
            ctx: RequestContext::new(caller),
            content: ContentConfig::default(),
            storage,
        }
    }

    /// A second caller with its own owner key.
    pub fn other_caller(&self) -> RequestContext {
        let caller = CallerId::new();
        self.owners.register(caller, OwnerKey::new("owner-2"));
        RequestContext::new(caller)
    }

    pub fn workspace_service(&self) -> WorkspaceService {
        WorkspaceService::new(self.store.clone())
    }

    pub fn folder_service(&self) -> FolderService {
        FolderService::new(self.store.clone(), &self.content)
    }

    pub fn tree_service(&self) -> TreeService {
        TreeService::new(self.store.clone(), &self.content)
    }

    pub fn document_service(&self) -> DocumentService {
        DocumentService::new(self.store.clone(), self.tree_service())
    }

    pub fn upload_service(&self) -> UploadService {
        UploadService::new(self.store.clone(), &self.storage)
    }

    pub fn version_service(&self) -> VersionService {
        VersionService::new(self.store.clone())
    }

    pub fn recycle_bin_service(&self) -> RecycleBinService {
        RecycleBinService::new(self.store.clone(), self.document_service())
    }

    pub fn workspace_request(title: &str) -> CreateWorkspaceRequest {
        CreateWorkspaceRequest {
            title: title.to_string(),
            workspace_type: String::new(),
            structure: None,
        }
    }

    pub fn folder_request(
        workspace_id: WorkspaceId,
        parent_folder_id: Option<FolderId>,
        name: &str,
    ) -> CreateFolderRequest {
        CreateFolderRequest {
            workspace_id,
            parent_folder_id,
            name: name.to_string(),
            description: None,
            metadata: None,
        }
    }

    pub async fn workspace(&self) -> Workspace {
        self.workspace_service()
            .create_workspace(&self.ctx, Self::workspace_request("Workspace"))
            .await
            .unwrap()
    }

    pub async fn folder(
        &self,
        workspace_id: WorkspaceId,
        parent_folder_id: Option<FolderId>,
        name: &str,
    ) -> Folder {
        self.folder_service()
            .create_folder(
                &self.ctx,
                Self::folder_request(workspace_id, parent_folder_id, name),
            )
            .await
            .unwrap()
    }

    pub async fn upload(
        &self,
        workspace_id: WorkspaceId,
        folder_id: Option<FolderId>,
        name: &str,
        data: &'static [u8],
    ) -> Document {
        let doc_type = match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("pdf") => DocumentType::Pdf,
            Some("png") | Some("jpg") => DocumentType::Image,
            Some("doc") | Some("docx") => DocumentType::Doc,
            _ => DocumentType::Other,
        };
        let req = UploadRequest {
            workspace_id,
            folder_id,
            doc_type,
            name: None,
            change_note: None,
            file: UploadFile {
                file_name: name.to_string(),
                mime_type: None,
                stream: bytes_stream(Bytes::from_static(data)),
            },
        };
        self.upload_service()
            .upload_and_save(&self.ctx, req)
            .await
            .unwrap()
    }
}
