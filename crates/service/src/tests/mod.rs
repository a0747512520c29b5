//! Test utilities and module declarations for service tests.

#![allow(clippy::unwrap_used, reason = "test code")]


use std::path::Path;
use std::sync::Arc;

use migrun_core::{Migration, MigratorConfig, TableName};
use tempfile::TempDir;

use crate::Migrator;
pub use memory_store::MemoryStore;

pub fn migrations_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_migrations(dir.path(), files);
    dir
}

pub fn write_migrations(dir: &Path, files: &[(&str, &str)]) {
    for (name, sql) in files {
        std::fs::write(dir.join(name), sql).unwrap();
    }
}

pub fn create_test_migrator(store: &MemoryStore, dir: &TempDir) -> Migrator {
    let config =
        MigratorConfig { directory: dir.path().to_path_buf(), table: TableName::default() };
    Migrator::new(Arc::new(store.clone()), config)
}

pub fn migrations(files: &[(&str, &str)]) -> Vec<Migration> {
    files.iter().map(|(name, sql)| Migration::new(*name, *sql)).collect()
}
