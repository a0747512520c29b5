//! Transactional applier.
//!
//! One transaction per batch. Each migration's statements and its tracking
//! row go in together; the first failure rolls the whole batch back.

use std::time::Instant;

use migrun_core::Migration;
use migrun_storage::{MigrationStore, MigrationTx};

use crate::error::MigrateError;

/// Applies `selection` in order inside a single transaction and records each
/// migration under `batch`. Returns the applied names.
///
/// Nothing is committed unless every migration and every tracking insert
/// succeeds. On failure the transaction is rolled back before the error is
/// returned; a failed rollback is reported alongside the original error.
pub async fn apply_batch(
    store: &dyn MigrationStore,
    selection: &[&Migration],
    batch: i32,
) -> Result<Vec<String>, MigrateError> {
    let mut tx = store.begin().await.map_err(MigrateError::Begin)?;
    tracing::debug!(batch, count = selection.len(), "migration transaction open");

    let mut applied = Vec::with_capacity(selection.len());
    for migration in selection {
        let started = Instant::now();
        let outcome = apply_one(&mut *tx, migration, batch).await;
        if let Err(failure) = outcome {
            return Err(abort(tx, failure).await);
        }
        tracing::info!(
            migration = %migration.name,
            batch,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "applied migration"
        );
        applied.push(migration.name.clone());
    }

    tx.commit().await.map_err(MigrateError::Commit)?;
    tracing::info!(batch, count = applied.len(), "migration batch committed");
    Ok(applied)
}

async fn apply_one(
    tx: &mut dyn MigrationTx,
    migration: &Migration,
    batch: i32,
) -> Result<(), MigrateError> {
    if migration.content.trim().is_empty() {
        tracing::warn!(migration = %migration.name, "migration file is empty, recording only");
    } else {
        tx.execute(&migration.content).await.map_err(|source| {
            MigrateError::MigrationExecution { name: migration.name.clone(), source }
        })?;
    }
    tx.record(&migration.name, batch)
        .await
        .map_err(|source| MigrateError::RecordInsert { name: migration.name.clone(), source })
}

async fn abort(tx: Box<dyn MigrationTx>, original: MigrateError) -> MigrateError {
    tracing::warn!(error = %original, "rolling back migration batch");
    match tx.rollback().await {
        Ok(()) => original,
        Err(rollback) => {
            tracing::error!(error = %rollback, "rollback failed");
            MigrateError::RollbackFailed { original: Box::new(original), rollback }
        },
    }
}
