//! PostgreSQL tracking table and transaction handle using sqlx.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use migrun_core::{AppliedRecord, TableName};
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::error::TrackingError;
use crate::traits::{MigrationStore, MigrationTx};

#[derive(Clone, Debug)]
pub struct PgMigrationStore {
    pool: PgPool,
    table: TableName,
}

impl PgMigrationStore {
    pub fn new(pool: PgPool, table: TableName) -> Self {
        Self { pool, table }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    fn error(&self, action: &'static str, source: sqlx::Error) -> TrackingError {
        TrackingError::new(self.table.as_str(), action, source)
    }
}

#[async_trait]
impl MigrationStore for PgMigrationStore {
    async fn ensure_table(&self) -> Result<(), TrackingError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                batch INTEGER NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table.quoted()
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| self.error("create table", e))?;
        tracing::debug!(table = %self.table, "tracking table ready");
        Ok(())
    }

    async fn load_applied(&self) -> Result<HashSet<String>, TrackingError> {
        let names: Vec<String> =
            sqlx::query_scalar(&format!("SELECT name FROM {}", self.table.quoted()))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| self.error("read applied migrations", e))?;
        Ok(names.into_iter().collect())
    }

    async fn next_batch(&self) -> Result<i32, TrackingError> {
        let current: i32 = sqlx::query_scalar(&format!(
            "SELECT COALESCE(MAX(batch), 0) FROM {}",
            self.table.quoted()
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| self.error("read batch number", e))?;
        Ok(current.saturating_add(1))
    }

    async fn list_applied(&self) -> Result<Vec<AppliedRecord>, TrackingError> {
        let rows = sqlx::query(&format!(
            "SELECT name, batch, applied_at FROM {} ORDER BY id",
            self.table.quoted()
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| self.error("list applied migrations", e))?;

        rows.iter()
            .map(|row| -> Result<AppliedRecord, sqlx::Error> {
                Ok(AppliedRecord {
                    name: row.try_get("name")?,
                    batch: row.try_get("batch")?,
                    applied_at: row.try_get::<DateTime<Utc>, _>("applied_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| self.error("decode applied migrations", e))
    }

    async fn begin(&self) -> Result<Box<dyn MigrationTx>, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgMigrationTx { tx, table: self.table.clone() }))
    }
}

/// The run's single transaction. sqlx rolls it back if dropped uncommitted.
pub struct PgMigrationTx {
    tx: Transaction<'static, Postgres>,
    table: TableName,
}

#[async_trait]
impl MigrationTx for PgMigrationTx {
    async fn execute(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        // No bound arguments, so sqlx uses the simple-query protocol and a
        // file may hold several statements.
        sqlx::Executor::execute(&mut *self.tx, sql).await?;
        Ok(())
    }

    async fn record(&mut self, name: &str, batch: i32) -> Result<(), sqlx::Error> {
        sqlx::query(&format!(
            "INSERT INTO {} (name, batch) VALUES ($1, $2)",
            self.table.quoted()
        ))
        .bind(name)
        .bind(batch)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}
