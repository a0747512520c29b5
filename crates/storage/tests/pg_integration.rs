//! Integration tests for PgMigrationStore.
//! Run with: DATABASE_URL=... cargo test -p migrun-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use migrun_core::TableName;
use migrun_storage::{MigrationStore, PgMigrationStore};
use sqlx::PgPool;
use uuid::Uuid;

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgMigrationStore integration tests");
    PgPool::connect(&url).await.expect("Failed to connect to PostgreSQL")
}

fn unique_ident(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn create_store(pool: &PgPool) -> PgMigrationStore {
    let table = TableName::new(&unique_ident("mig")).unwrap();
    PgMigrationStore::new(pool.clone(), table)
}

async fn relation_exists(pool: &PgPool, name: &str) -> bool {
    sqlx::query_scalar::<_, bool>("SELECT to_regclass($1) IS NOT NULL")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn pg_ensure_table_is_idempotent() {
    let pool = connect().await;
    let store = create_store(&pool);

    assert!(!relation_exists(&pool, store.table().as_str()).await);
    store.ensure_table().await.unwrap();
    store.ensure_table().await.unwrap();
    assert!(relation_exists(&pool, store.table().as_str()).await);

    assert!(store.load_applied().await.unwrap().is_empty());
    assert_eq!(store.next_batch().await.unwrap(), 1);
}

#[tokio::test]
#[ignore]
async fn pg_committed_batch_is_recorded() {
    let pool = connect().await;
    let store = create_store(&pool);
    store.ensure_table().await.unwrap();
    let target = unique_ident("t");

    let mut tx = store.begin().await.unwrap();
    tx.execute(&format!("CREATE TABLE {target} (id INT); INSERT INTO {target} VALUES (1);"))
        .await
        .unwrap();
    tx.record("001_create.sql", 1).await.unwrap();
    tx.commit().await.unwrap();

    assert!(relation_exists(&pool, &target).await);
    let applied = store.load_applied().await.unwrap();
    assert!(applied.contains("001_create.sql"));
    assert_eq!(store.next_batch().await.unwrap(), 2);

    let records = store.list_applied().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "001_create.sql");
    assert_eq!(records[0].batch, 1);
}

#[tokio::test]
#[ignore]
async fn pg_rollback_discards_schema_and_records() {
    let pool = connect().await;
    let store = create_store(&pool);
    store.ensure_table().await.unwrap();
    let target = unique_ident("t");

    let mut tx = store.begin().await.unwrap();
    tx.execute(&format!("CREATE TABLE {target} (id INT)")).await.unwrap();
    tx.record("A", 1).await.unwrap();
    let failed = tx.execute("THIS IS NOT SQL").await;
    assert!(failed.is_err());
    tx.rollback().await.unwrap();

    assert!(!relation_exists(&pool, &target).await);
    assert!(store.load_applied().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn pg_duplicate_name_is_rejected() {
    let pool = connect().await;
    let store = create_store(&pool);
    store.ensure_table().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    tx.record("001", 1).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    assert!(tx.record("001", 2).await.is_err());
    tx.rollback().await.unwrap();

    assert_eq!(store.list_applied().await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn pg_dropped_transaction_rolls_back() {
    let pool = connect().await;
    let store = create_store(&pool);
    store.ensure_table().await.unwrap();

    {
        let mut tx = store.begin().await.unwrap();
        tx.record("never_committed", 1).await.unwrap();
    }

    assert!(store.load_applied().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn pg_reserved_and_mixed_case_table_names() {
    let pool = connect().await;
    let schema = unique_ident("s");
    sqlx::query(&format!("CREATE SCHEMA {schema}")).execute(&pool).await.unwrap();

    for name in ["order", "MyLedger"] {
        let table = TableName::new(&format!("{schema}.{name}")).unwrap();
        let store = PgMigrationStore::new(pool.clone(), table.clone());
        store.ensure_table().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.record("001", 1).await.unwrap();
        tx.commit().await.unwrap();

        assert!(relation_exists(&pool, &table.quoted()).await);
        assert!(store.load_applied().await.unwrap().contains("001"));
        assert_eq!(store.next_batch().await.unwrap(), 2);
    }
    assert!(!relation_exists(&pool, &format!("{schema}.myledger")).await);

    sqlx::query(&format!("DROP SCHEMA {schema} CASCADE")).execute(&pool).await.unwrap();
}
