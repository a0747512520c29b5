//! Typed error enum for a migration run.
//!
//! Every variant is fatal to the run. Variants raised after the transaction
//! opened are only returned once the batch has been rolled back.

use migrun_core::SourceError;
use migrun_storage::{ConnectError, TrackingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("connect: {0}")]
    Connect(#[from] ConnectError),

    /// Migration directory or one of its files could not be read.
    #[error("source: {0}")]
    Source(#[from] SourceError),

    /// Tracking-table bootstrap or read failed.
    #[error(transparent)]
    TrackingTable(#[from] TrackingError),

    #[error("cannot open migration transaction: {0}")]
    Begin(#[source] sqlx::Error),

    /// The migration's own statements failed.
    #[error("migration {name} failed: {source}")]
    MigrationExecution {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    /// The statements ran but the tracking row could not be inserted.
    #[error("cannot record migration {name} as applied: {source}")]
    RecordInsert {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("cannot commit migration batch: {0}")]
    Commit(#[source] sqlx::Error),

    /// The batch failed and the rollback issued for it failed too.
    #[error("{original}; rollback also failed: {rollback}")]
    RollbackFailed {
        original: Box<MigrateError>,
        #[source]
        rollback: sqlx::Error,
    },
}

impl MigrateError {
    /// Name of the phase the run failed in.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Source(_) => "read migrations",
            Self::TrackingTable(_) => "tracking table",
            Self::Begin(_) | Self::MigrationExecution { .. } | Self::RecordInsert { .. } => {
                "apply"
            },
            Self::Commit(_) => "commit",
            Self::RollbackFailed { original, .. } => original.phase(),
        }
    }

    /// The migration being applied when the run failed, if any.
    pub fn migration_name(&self) -> Option<&str> {
        match self {
            Self::MigrationExecution { name, .. } | Self::RecordInsert { name, .. } => Some(name),
            Self::RollbackFailed { original, .. } => original.migration_name(),
            _ => None,
        }
    }

    /// Whether a rollback was attempted and failed.
    pub fn rollback_failed(&self) -> bool {
        matches!(self, Self::RollbackFailed { .. })
    }
}
