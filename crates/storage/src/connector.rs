//! Driver-keyed connector registry.
//!
//! Each driver turns a `DatabaseConfig` into something that can open a
//! `MigrationStore`. The migrator only sees the trait, so a new driver is a
//! new registry entry and nothing else.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use migrun_core::{
    DatabaseConfig, TableName, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::error::ConnectError;
use crate::pg_store::PgMigrationStore;
use crate::traits::MigrationStore;

/// Opens the store for one driver.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Canonical driver identifier.
    fn driver(&self) -> &'static str;

    async fn connect(&self) -> Result<Arc<dyn MigrationStore>, ConnectError>;
}

type BuildConnector = fn(&DatabaseConfig, &TableName) -> Result<Box<dyn Connector>, ConnectError>;

const DRIVERS: &[(&[&str], BuildConnector)] = &[(&["postgres", "postgresql"], build_postgres)];

fn build_postgres(
    db: &DatabaseConfig,
    table: &TableName,
) -> Result<Box<dyn Connector>, ConnectError> {
    Ok(Box::new(PostgresConnector::from_config(db, table.clone())?))
}

/// Identifiers accepted by [`connector_for`].
pub fn supported_drivers() -> Vec<&'static str> {
    DRIVERS.iter().flat_map(|(names, _)| names.iter().copied()).collect()
}

/// Pick and build the connector for `db.driver`.
///
/// Fails before any network I/O if the driver is unknown or a required
/// setting is empty.
pub fn connector_for(
    db: &DatabaseConfig,
    table: &TableName,
) -> Result<Box<dyn Connector>, ConnectError> {
    let driver = db.driver.trim().to_ascii_lowercase();
    if driver.is_empty() {
        return Err(ConnectError::MissingField("driver"));
    }
    let (_, build) = DRIVERS.iter().find(|(names, _)| names.contains(&driver.as_str())).ok_or_else(
        || ConnectError::UnsupportedDriver {
            driver: db.driver.clone(),
            supported: supported_drivers().join(", "),
        },
    )?;
    build(db, table)
}

pub struct PostgresConnector {
    options: PgConnectOptions,
    table: TableName,
}

impl fmt::Debug for PostgresConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnector")
            .field("host", &self.options.get_host())
            .field("port", &self.options.get_port())
            .field("database", &self.options.get_database())
            .field("table", &self.table)
            .finish()
    }
}

impl PostgresConnector {
    /// Builds connect options from parts, so credentials need no escaping.
    pub fn from_config(db: &DatabaseConfig, table: TableName) -> Result<Self, ConnectError> {
        if db.host.trim().is_empty() {
            return Err(ConnectError::MissingField("host"));
        }
        if db.user.trim().is_empty() {
            return Err(ConnectError::MissingField("user"));
        }
        if db.database.trim().is_empty() {
            return Err(ConnectError::MissingField("database"));
        }
        if db.port == 0 {
            return Err(ConnectError::MissingField("port"));
        }

        let mut options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.user)
            .database(&db.database);
        if !db.password.is_empty() {
            options = options.password(&db.password);
        }
        Ok(Self { options, table })
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    fn driver(&self) -> &'static str {
        "postgres"
    }

    async fn connect(&self) -> Result<Arc<dyn MigrationStore>, ConnectError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect_with(self.options.clone())
            .await
            .map_err(ConnectError::Connect)?;
        tracing::info!(
            host = self.options.get_host(),
            port = self.options.get_port(),
            database = ?self.options.get_database(),
            "connected to PostgreSQL"
        );
        Ok(Arc::new(PgMigrationStore::new(pool, self.table.clone())))
    }
}
