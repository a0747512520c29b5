pub(crate) mod status;
pub(crate) mod up;

use anyhow::Result;
use migrun_core::{DatabaseConfig, MigratorConfig};
use migrun_service::{MigrateError, Migrator};
use migrun_storage::connector_for;

/// Resolve the driver, connect, and hand the store to a `Migrator`.
///
/// An unknown driver fails here, before any connection attempt.
pub(crate) async fn open_migrator(
    db: &DatabaseConfig,
    config: MigratorConfig,
) -> Result<Migrator> {
    let connector = connector_for(db, &config.table).map_err(MigrateError::from)?;
    tracing::debug!(driver = connector.driver(), "resolved connector");
    let store = connector.connect().await.map_err(MigrateError::from)?;
    Ok(Migrator::new(store, config))
}
