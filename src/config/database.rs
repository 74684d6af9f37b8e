use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;

/// Connect to the database.
///
/// Does NOT run migrations - call `migrate()` separately.
pub async fn connect(settings: &BootstrapSettings) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(settings.database_url())
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!(url = settings.database_url(), "connected to database");

    Ok(db)
}

/// Bring the schema up to date.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("migrate_database", e))?;

    tracing::debug!("database migrations complete");

    Ok(())
}
