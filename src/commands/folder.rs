//! Folder tree inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::types::{FolderId, WorkspaceId};
use docvault_entity::folder::FolderTreeNode;
use docvault_service::TreeService;

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Print the live folder tree of a workspace
    Tree {
        /// Caller ID
        #[arg(long)]
        caller: Uuid,
        /// Workspace ID
        #[arg(long)]
        workspace: Uuid,
        /// Start below this folder instead of the workspace root
        #[arg(long)]
        parent: Option<Uuid>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct TreeRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Documents")]
    documents: u64,
    #[tabled(rename = "ID")]
    id: String,
}

/// Flatten the forest in display order, indenting each name by depth.
fn flatten(nodes: &[FolderTreeNode]) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(&FolderTreeNode, usize)> = nodes.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        rows.push(TreeRow {
            path: format!("{}{}", "  ".repeat(depth), node.folder.name),
            documents: node.document_count,
            id: node.folder.id.to_string(),
        });
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
    rows
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let tree = TreeService::new(super::build_store(config, &db).await?, &config.content);

    match &args.command {
        FolderCommand::Tree {
            caller,
            workspace,
            parent,
        } => {
            let ctx = super::caller_context(*caller);
            let forest = tree
                .get_folder_tree(
                    &ctx,
                    WorkspaceId::from_uuid(*workspace),
                    parent.map(FolderId::from_uuid),
                )
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&forest),
                OutputFormat::Table => output::print_list(&flatten(&forest), format),
            }
        }
    }

    Ok(())
}
