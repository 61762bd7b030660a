//! Owner key directory commands.

use clap::{Args, Subcommand};
use uuid::Uuid;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::traits::OwnerResolver;
use docvault_core::types::{CallerId, OwnerKey};

use crate::output;

/// Arguments for owner commands
#[derive(Debug, Args)]
pub struct OwnerArgs {
    /// Owner subcommand
    #[command(subcommand)]
    pub command: OwnerCommand,
}

/// Owner subcommands
#[derive(Debug, Subcommand)]
pub enum OwnerCommand {
    /// Bind a caller identity to an owner key
    Register {
        /// Caller ID
        #[arg(long)]
        caller: Uuid,
        /// Owner key
        #[arg(long)]
        owner_key: String,
    },
    /// Show the owner key of a caller
    Show {
        /// Caller ID
        #[arg(long)]
        caller: Uuid,
    },
}

/// Execute owner commands
pub async fn execute(args: &OwnerArgs, config: &AppConfig) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let directory = db.owners();

    match &args.command {
        OwnerCommand::Register { caller, owner_key } => {
            let owner_key = OwnerKey::new(owner_key.trim());
            if owner_key.as_str().is_empty() {
                return Err(AppError::validation("Owner key cannot be empty"));
            }
            directory
                .register(CallerId::from_uuid(*caller), &owner_key)
                .await?;
            output::print_success(&format!("Caller {caller} now maps to {owner_key}"));
        }
        OwnerCommand::Show { caller } => {
            let owner_key = directory
                .resolve_owner_key(&CallerId::from_uuid(*caller))
                .await?;
            println!("{owner_key}");
        }
    }

    Ok(())
}
