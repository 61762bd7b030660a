//! End-to-end tests for the folder/document lifecycle.

mod common;

use docvault_core::error::ErrorKind;
use docvault_core::types::{FolderId, WorkspaceId};
use docvault_service::folder::CreateFolderRequest;
use docvault_service::workspace::CreateWorkspaceRequest;

use common::TestVault;

fn folder_request(
    workspace_id: WorkspaceId,
    parent: Option<FolderId>,
    name: &str,
) -> CreateFolderRequest {
    CreateFolderRequest {
        workspace_id,
        parent_folder_id: parent,
        name: name.to_string(),
        description: None,
        metadata: None,
    }
}

#[tokio::test]
async fn test_upload_delete_restore_cycle() {
    let vault = TestVault::new().await;
    let ws = vault
        .workspaces
        .create_workspace(
            &vault.ctx,
            CreateWorkspaceRequest {
                title: "W".to_string(),
                workspace_type: "general".to_string(),
                structure: None,
            },
        )
        .await
        .unwrap();

    let docs = vault
        .folders
        .create_folder(&vault.ctx, folder_request(ws.id, None, "Docs"))
        .await
        .unwrap();
    let year = vault
        .folders
        .create_folder(&vault.ctx, folder_request(ws.id, Some(docs.id), "2024"))
        .await
        .unwrap();
    assert_eq!(docs.path, "/Docs");
    assert_eq!(year.path, "/Docs/2024");

    let first = vault.upload_pdf(ws.id, Some(docs.id), "report.pdf", b"v1").await;
    let second = vault.upload_pdf(ws.id, Some(docs.id), "report.pdf", b"v2 body").await;
    assert_eq!(first.id, second.id);
    assert_eq!(second.version(), 2);

    let ledger = vault
        .versions
        .get_document_versions(&vault.ctx, second.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].version, 1);
    assert_eq!(ledger[0].size, 2);

    let body = vault
        .documents
        .read_document_base64(&vault.ctx, second.id)
        .await
        .unwrap();
    assert_eq!(body, "djIgYm9keQ==");

    vault.folders.delete_folder(&vault.ctx, docs.id).await.unwrap();

    let tree = vault
        .tree
        .get_folder_tree(&vault.ctx, ws.id, None)
        .await
        .unwrap();
    assert!(tree.is_empty());
    let bin = vault.recycle_bin.list(&vault.ctx, Some(ws.id)).await.unwrap();
    assert_eq!(bin.folders.len(), 2);
    assert_eq!(bin.documents.len(), 1);

    let restored = vault.folders.restore_folder(&vault.ctx, docs.id).await.unwrap();
    assert!(!restored.deleted);

    let tree = vault
        .tree
        .get_folder_tree(&vault.ctx, ws.id, None)
        .await
        .unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].folder.id, docs.id);
    assert!(tree[0].children.is_empty());
    assert_eq!(tree[0].document_count, 0);

    let doc = vault.documents.get_document(&vault.ctx, second.id).await.unwrap();
    assert!(doc.deleted);
    let err = vault
        .folders
        .restore_folder(&vault.ctx, docs.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidState));
}

#[tokio::test]
async fn test_purge_removes_subtree_and_blobs() {
    let vault = TestVault::new().await;
    let ws = vault
        .workspaces
        .create_workspace(
            &vault.ctx,
            CreateWorkspaceRequest {
                title: "Archive".to_string(),
                workspace_type: String::new(),
                structure: None,
            },
        )
        .await
        .unwrap();
    let docs = vault
        .folders
        .create_folder(&vault.ctx, folder_request(ws.id, None, "Docs"))
        .await
        .unwrap();
    let doc = vault.upload_pdf(ws.id, Some(docs.id), "scan.pdf", b"scan").await;

    vault.folders.delete_folder(&vault.ctx, docs.id).await.unwrap();
    vault
        .folders
        .permanently_delete_folder(&vault.ctx, docs.id)
        .await
        .unwrap();

    let err = vault.documents.get_document(&vault.ctx, doc.id).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
    assert!(vault.recycle_bin.list(&vault.ctx, None).await.unwrap().is_empty());
}
