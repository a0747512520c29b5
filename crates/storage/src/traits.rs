//! Storage trait abstraction
//!
//! `MigrationStore` is the applied-set tracker plus a way to open the single
//! transaction a run applies its batch in. `MigrationTx` is that transaction.

use std::collections::HashSet;

use async_trait::async_trait;
use migrun_core::AppliedRecord;

use crate::error::TrackingError;

/// Tracking-table operations. None of these run inside a migration
/// transaction.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// Create the tracking table if it does not exist yet.
    async fn ensure_table(&self) -> Result<(), TrackingError>;

    /// Names of every recorded migration.
    async fn load_applied(&self) -> Result<HashSet<String>, TrackingError>;

    /// Batch number the next run should record under.
    async fn next_batch(&self) -> Result<i32, TrackingError>;

    /// All tracking rows in insertion order.
    async fn list_applied(&self) -> Result<Vec<AppliedRecord>, TrackingError>;

    /// Open the transaction a batch is applied in.
    async fn begin(&self) -> Result<Box<dyn MigrationTx>, sqlx::Error>;
}

/// An open transaction. Dropping it without `commit` rolls it back.
#[async_trait]
pub trait MigrationTx: Send {
    /// Execute raw statement text, possibly several statements.
    async fn execute(&mut self, sql: &str) -> Result<(), sqlx::Error>;

    /// Insert the tracking row for `name`.
    async fn record(&mut self, name: &str, batch: i32) -> Result<(), sqlx::Error>;

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error>;

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error>;
}
