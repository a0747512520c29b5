//! Migration source reader.
//!
//! Lists a directory and loads every non-directory entry as a migration,
//! sorted by file name. Sorting here, not in the filesystem, keeps execution
//! order identical across platforms.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::migration::Migration;

/// Reads all migrations in `directory`, ordered lexicographically by name.
///
/// # Errors
/// `SourceUnreadable` if the directory cannot be listed, `EntryUnreadable`
/// naming the offending path if a single entry cannot be inspected or read.
pub async fn read_migrations(directory: &Path) -> Result<Vec<Migration>, SourceError> {
    let unreadable =
        |source| SourceError::SourceUnreadable { path: directory.to_path_buf(), source };

    let mut entries = tokio::fs::read_dir(directory).await.map_err(unreadable)?;
    let mut files: Vec<(String, PathBuf)> = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        let path = entry.path();
        // Follows symlinks so a link to a directory is skipped too.
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| SourceError::EntryUnreadable { path: path.clone(), source })?;
        if metadata.is_dir() {
            tracing::debug!(path = %path.display(), "skipping directory");
            continue;
        }
        let name = entry.file_name().into_string().map_err(|_| SourceError::EntryUnreadable {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
        })?;
        files.push((name, path));
    }

    files.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut migrations = Vec::with_capacity(files.len());
    for (name, path) in files {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::EntryUnreadable { path, source })?;
        migrations.push(Migration { name, content });
    }

    tracing::debug!(directory = %directory.display(), count = migrations.len(), "read migrations");
    Ok(migrations)
}
