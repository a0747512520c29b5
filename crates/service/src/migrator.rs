//! Run orchestration.

use std::sync::Arc;

use migrun_core::{read_migrations, AppliedRecord, MigrationPlan, MigratorConfig, RunReport};
use migrun_storage::MigrationStore;
use serde::Serialize;

use crate::applier::apply_batch;
use crate::error::MigrateError;

/// Sequences a migration run against one store.
///
/// Concurrent runs against the same database are not coordinated; callers
/// must guarantee a single writer.
pub struct Migrator {
    store: Arc<dyn MigrationStore>,
    config: MigratorConfig,
}

/// Read-only view of the tracking table against the directory.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub applied: Vec<AppliedRecord>,
    pub pending: Vec<String>,
    /// Recorded as applied but no longer present on disk.
    pub orphaned: Vec<String>,
}

impl Migrator {
    #[must_use]
    pub fn new(store: Arc<dyn MigrationStore>, config: MigratorConfig) -> Self {
        Self { store, config }
    }

    /// Bootstrap the tracking table, read the applied set, read the directory.
    /// Nothing is modified apart from creating the tracking table.
    pub async fn plan(&self) -> Result<MigrationPlan, MigrateError> {
        self.store.ensure_table().await?;
        let applied = self.store.load_applied().await?;
        tracing::info!(
            table = %self.config.table,
            count = applied.len(),
            "loaded applied migrations"
        );

        let migrations = read_migrations(&self.config.directory).await?;
        tracing::info!(
            directory = %self.config.directory.display(),
            count = migrations.len(),
            "discovered migrations"
        );

        Ok(MigrationPlan::new(migrations, applied))
    }

    /// Apply every pending migration in one transaction.
    ///
    /// With nothing pending no transaction is opened.
    pub async fn run(&self) -> Result<RunReport, MigrateError> {
        let plan = self.plan().await?;
        let pending = plan.pending();
        let mut report = RunReport {
            discovered: plan.migrations.len(),
            already_applied: plan.applied_count(),
            ..RunReport::default()
        };
        tracing::info!(
            pending = pending.len(),
            already_applied = report.already_applied,
            "selected migrations"
        );

        if plan.is_up_to_date() {
            tracing::info!("database is up to date");
            return Ok(report);
        }

        let batch = self.store.next_batch().await?;
        report.applied = apply_batch(self.store.as_ref(), &pending, batch).await?;
        report.batch = Some(batch);
        Ok(report)
    }

    pub async fn status(&self) -> Result<StatusReport, MigrateError> {
        let plan = self.plan().await?;
        let applied = self.store.list_applied().await?;
        Ok(StatusReport {
            applied,
            pending: plan.pending().into_iter().map(|m| m.name.clone()).collect(),
            orphaned: plan.orphaned().into_iter().map(str::to_owned).collect(),
        })
    }
}
