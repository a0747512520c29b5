//! Typed errors for the storage layer.

use thiserror::Error;

/// Failure to build a connector or open a connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// No connector is registered for this driver identifier.
    #[error("unsupported database driver {driver:?} (supported: {supported})")]
    UnsupportedDriver { driver: String, supported: String },

    /// A connection parameter the driver needs is empty.
    #[error("missing database setting: {0}")]
    MissingField(&'static str),

    /// Connecting or pinging the server failed.
    #[error("cannot connect to database: {0}")]
    Connect(#[source] sqlx::Error),
}

/// Tracking-table DDL or query failure.
#[derive(Debug, Error)]
#[error("tracking table {table}: cannot {action}: {source}")]
pub struct TrackingError {
    pub table: String,
    pub action: &'static str,
    #[source]
    pub source: sqlx::Error,
}

impl TrackingError {
    pub fn new(table: impl Into<String>, action: &'static str, source: sqlx::Error) -> Self {
        Self { table: table.into(), action, source }
    }
}
