//! Workspace inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_entity::workspace::Workspace;
use docvault_service::WorkspaceService;

use crate::output::{self, OutputFormat};

/// Arguments for workspace commands
#[derive(Debug, Args)]
pub struct WorkspaceArgs {
    /// Workspace subcommand
    #[command(subcommand)]
    pub command: WorkspaceCommand,
}

/// Workspace subcommands
#[derive(Debug, Subcommand)]
pub enum WorkspaceCommand {
    /// List the caller's workspaces
    List {
        /// Caller ID
        #[arg(long)]
        caller: Uuid,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct WorkspaceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    workspace_type: String,
    #[tabled(rename = "Updated")]
    updated_at: String,
}

impl From<Workspace> for WorkspaceRow {
    fn from(ws: Workspace) -> Self {
        Self {
            id: ws.id.to_string(),
            title: ws.title,
            workspace_type: ws.workspace_type,
            updated_at: ws.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute workspace commands
pub async fn execute(
    args: &WorkspaceArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let service = WorkspaceService::new(super::build_store(config, &db).await?);

    match &args.command {
        WorkspaceCommand::List { caller } => {
            let ctx = super::caller_context(*caller);
            let workspaces = service.list_workspaces(&ctx).await?;
            let rows: Vec<WorkspaceRow> = workspaces.into_iter().map(WorkspaceRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
