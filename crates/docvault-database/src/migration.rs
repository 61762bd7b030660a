//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every migration not yet recorded in `_sqlx_migrations`. Returns the
/// version of the newest migration known to this build.
pub async fn run_migrations(pool: &PgPool) -> AppResult<i64> {
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;
    info!(schema_version = latest, "Schema up to date");
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_tables_migration_is_embedded() {
        let migration = MIGRATOR
            .iter()
            .find(|m| m.version == 20250101000001)
            .expect("content tables migration");
        assert_eq!(migration.description, "create content tables");
    }
}
