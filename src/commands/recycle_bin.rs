//! Recycle bin commands.

use clap::{Args, Subcommand};
use dialoguer::Confirm;
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::types::{FolderId, WorkspaceId};
use docvault_service::{DocumentService, RecycleBinContents, RecycleBinService, TreeService};

use crate::output::{self, OutputFormat};

/// Arguments for recycle bin commands
#[derive(Debug, Args)]
pub struct RecycleBinArgs {
    /// Recycle bin subcommand
    #[command(subcommand)]
    pub command: RecycleBinCommand,
}

/// Recycle bin subcommands
#[derive(Debug, Subcommand)]
pub enum RecycleBinCommand {
    /// List soft-deleted folders and documents
    List {
        /// Caller ID
        #[arg(long)]
        caller: Uuid,
        /// Restrict to one workspace
        #[arg(long)]
        workspace: Option<Uuid>,
    },
    /// Permanently remove soft-deleted documents
    Empty {
        /// Caller ID
        #[arg(long)]
        caller: Uuid,
        /// Restrict to one workspace
        #[arg(long)]
        workspace: Option<Uuid>,
        /// Restrict to documents filed in this folder
        #[arg(long)]
        folder: Option<Uuid>,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct BinRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Deleted")]
    deleted_at: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn rows(bin: RecycleBinContents) -> Vec<BinRow> {
    let stamp = |at: Option<chrono::DateTime<chrono::Utc>>| {
        at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    };
    let folders = bin.folders.into_iter().map(|f| BinRow {
        kind: "folder",
        name: f.path,
        deleted_at: stamp(f.deleted_at),
        id: f.id.to_string(),
    });
    let documents = bin.documents.into_iter().map(|d| BinRow {
        kind: "document",
        name: d.name,
        deleted_at: stamp(d.deleted_at),
        id: d.id.to_string(),
    });
    folders.chain(documents).collect()
}

/// Execute recycle bin commands
pub async fn execute(
    args: &RecycleBinArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let store = super::build_store(config, &db).await?;
    let tree = TreeService::new(store.clone(), &config.content);
    let service = RecycleBinService::new(store.clone(), DocumentService::new(store, tree));

    match &args.command {
        RecycleBinCommand::List { caller, workspace } => {
            let ctx = super::caller_context(*caller);
            let bin = service
                .list(&ctx, workspace.map(WorkspaceId::from_uuid))
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&bin),
                OutputFormat::Table => output::print_list(&rows(bin), format),
            }
        }
        RecycleBinCommand::Empty {
            caller,
            workspace,
            folder,
            force,
        } => {
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt("Permanently delete every matching document in the recycle bin?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Prompt error: {e}")))?;

                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let ctx = super::caller_context(*caller);
            let removed = service
                .empty(
                    &ctx,
                    workspace.map(WorkspaceId::from_uuid),
                    folder.map(FolderId::from_uuid),
                )
                .await?;
            output::print_success(&format!("Removed {removed} document(s)"));
        }
    }

    Ok(())
}
