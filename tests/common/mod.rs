//! Shared harness for end-to-end tests: in-memory repositories and a
//! local blob store rooted in a temporary directory.

use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use docvault_core::config::{ContentConfig, StorageConfig};
use docvault_core::traits::bytes_stream;
use docvault_core::types::{CallerId, FolderId, OwnerKey, WorkspaceId};
use docvault_database::memory::{
    MemoryDocumentRepository, MemoryFolderRepository, MemoryOwnerDirectory,
    MemoryWorkspaceRepository,
};
use docvault_entity::document::{Document, DocumentType};
use docvault_storage::LocalBlobStore;
use docvault_service::{
    ContentStore, DocumentService, FolderService, RecycleBinService, RequestContext, TreeService,
    UploadFile, UploadRequest, UploadService, VersionService, WorkspaceService,
};

/// A fully wired content engine for one caller.
pub struct TestVault {
    pub ctx: RequestContext,
    pub workspaces: WorkspaceService,
    pub folders: FolderService,
    pub tree: TreeService,
    pub documents: DocumentService,
    pub uploads: UploadService,
    pub versions: VersionService,
    pub recycle_bin: RecycleBinService,
    _blob_dir: TempDir,
}

impl TestVault {
    pub async fn new() -> Self {
        let blob_dir = TempDir::new().expect("tempdir");
        let blobs = LocalBlobStore::new(blob_dir.path().to_str().expect("utf-8 path"))
            .await
            .expect("blob store");

        let owners = MemoryOwnerDirectory::new();
        let caller = CallerId::new();
        owners.register(caller, OwnerKey::new("owner-e2e"));

        let store = ContentStore::new(
            Arc::new(MemoryWorkspaceRepository::new()),
            Arc::new(MemoryFolderRepository::new()),
            Arc::new(MemoryDocumentRepository::new()),
            Arc::new(blobs),
            Arc::new(owners),
        );
        let content = ContentConfig::default();
        let tree = TreeService::new(store.clone(), &content);
        let documents = DocumentService::new(store.clone(), tree.clone());

        Self {
            ctx: RequestContext::new(caller),
            workspaces: WorkspaceService::new(store.clone()),
            folders: FolderService::new(store.clone(), &content),
            tree,
            documents: documents.clone(),
            uploads: UploadService::new(store.clone(), &StorageConfig::default()),
            versions: VersionService::new(store.clone()),
            recycle_bin: RecycleBinService::new(store, documents),
            _blob_dir: blob_dir,
        }
    }

    pub async fn upload_pdf(
        &self,
        workspace_id: WorkspaceId,
        folder_id: Option<FolderId>,
        name: &str,
        data: &'static [u8],
    ) -> Document {
        let req = UploadRequest {
            workspace_id,
            folder_id,
            doc_type: DocumentType::Pdf,
            name: None,
            change_note: None,
            file: UploadFile {
                file_name: name.to_string(),
                mime_type: Some("application/pdf".to_string()),
                stream: bytes_stream(Bytes::from_static(data)),
            },
        };
        self.uploads
            .upload_and_save(&self.ctx, req)
            .await
            .expect("upload")
    }
}
