use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the migration directory.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The directory itself could not be listed.
    #[error("cannot list migration directory {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single entry could not be inspected or read.
    #[error("cannot read migration {}: {source}", path.display())]
    EntryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Invalid configuration values rejected before any I/O happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tracking table name {name:?}: {reason}")]
    InvalidTableName { name: String, reason: &'static str },
}
