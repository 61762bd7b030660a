//! CLI command definitions and dispatch.

pub mod folder;
pub mod migrate;
pub mod owner;
pub mod recycle_bin;
pub mod workspace;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::types::CallerId;
use docvault_database::DatabasePool;
use docvault_service::{ContentStore, RequestContext};

use crate::output::OutputFormat;

/// DocVault administration
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file (without extension)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate,
    /// Owner key directory
    Owner(owner::OwnerArgs),
    /// Workspace inspection
    Workspace(workspace::WorkspaceArgs),
    /// Folder inspection
    Folder(folder::FolderArgs),
    /// Recycle bin management
    RecycleBin(recycle_bin::RecycleBinArgs),
}

impl Cli {
    /// Load configuration from `--config`, the `DOCVAULT_ENV` overlay and
    /// `DOCVAULT__*` environment variables.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        let env = std::env::var("DOCVAULT_ENV").unwrap_or_else(|_| "development".to_string());
        AppConfig::load(&self.config, &env)
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(config).await,
            Commands::Owner(args) => owner::execute(args, config).await,
            Commands::Workspace(args) => workspace::execute(args, config, self.format).await,
            Commands::Folder(args) => folder::execute(args, config, self.format).await,
            Commands::RecycleBin(args) => recycle_bin::execute(args, config, self.format).await,
        }
    }
}

/// Helper: connect to the database configured in `config`
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: wire repositories, blob store and owner directory
pub async fn build_store(config: &AppConfig, db: &DatabasePool) -> Result<ContentStore, AppError> {
    let blobs = docvault_storage::build_blob_store(&config.storage).await?;
    Ok(ContentStore::new(
        Arc::new(db.workspaces()),
        Arc::new(db.folders()),
        Arc::new(db.documents()),
        blobs,
        Arc::new(db.owners()),
    ))
}

/// Helper: build a request context for a caller UUID given on the command line
pub fn caller_context(caller: Uuid) -> RequestContext {
    RequestContext::new(CallerId::from_uuid(caller))
}
