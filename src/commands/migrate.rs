//! Database migration command.

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;

use crate::output;

/// Check the server answers, then apply pending migrations
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let server = db.server_version().await?;
    println!("Connected: {server}");

    let version = docvault_database::migration::run_migrations(db.pool()).await?;
    output::print_success(&format!("Schema is at version {version}."));
    db.close().await;
    Ok(())
}
