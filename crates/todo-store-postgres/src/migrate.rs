//! Embedded, reversible schema migrations.

use sqlx::migrate::Migrator;

use crate::{PgTaskStore, Result};

/// Every migration under `migrations/`, compiled into the binary.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

impl PgTaskStore {
  /// Apply all pending migrations.
  pub async fn migrate_up(&self) -> Result<()> {
    let available = MIGRATOR
      .iter()
      .filter(|m| !m.migration_type.is_down_migration())
      .count();
    tracing::info!(available, "running database migrations");
    MIGRATOR.run(self.pool()).await?;
    tracing::info!(version = ?latest_version(), "database schema is up to date");
    Ok(())
  }

  /// Revert every applied migration.
  pub async fn migrate_down(&self) -> Result<()> {
    tracing::info!("rolling back database migrations");
    MIGRATOR.undo(self.pool(), 0).await?;
    tracing::info!("database migrations rolled back");
    Ok(())
  }
}

fn latest_version() -> Option<i64> {
  MIGRATOR.iter().map(|m| m.version).max()
}
