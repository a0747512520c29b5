//! Explicit configuration values handed to the connector and the migrator.
//!
//! Nothing below reads the environment; the binary assembles these from its
//! flags and passes them in.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{
    DEFAULT_DRIVER, DEFAULT_MIGRATION_DIR, DEFAULT_PG_PORT, DEFAULT_TRACKING_TABLE,
    MAX_IDENTIFIER_LEN,
};
use crate::error::ConfigError;

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Validated name of the tracking table, optionally schema-qualified.
///
/// The name is interpolated into DDL and DML, so only plain identifiers are
/// accepted. Each part is double-quoted when used in SQL: reserved words work
/// and case is kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        let invalid = |reason| ConfigError::InvalidTableName { name: name.to_owned(), reason };

        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() > 2 {
            return Err(invalid("at most one schema qualifier is allowed"));
        }
        for part in &parts {
            if part.is_empty() {
                return Err(invalid("identifier is empty"));
            }
            if part.len() > MAX_IDENTIFIER_LEN {
                return Err(invalid("identifier is longer than 63 bytes"));
            }
            if !IDENTIFIER_REGEX.is_match(part) {
                return Err(invalid("only letters, digits and underscores are allowed"));
            }
        }
        Ok(Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a quoted SQL identifier, e.g. `"ops"."Ledger"`.
    pub fn quoted(&self) -> String {
        self.0.split('.').map(|part| format!("\"{part}\"")).collect::<Vec<_>>().join(".")
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TRACKING_TABLE.to_owned())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TableName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Connection parameters. Which fields are required depends on the driver.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_owned(),
            host: "localhost".to_owned(),
            port: DEFAULT_PG_PORT,
            user: "postgres".to_owned(),
            password: String::new(),
            database: String::new(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Settings the migrator itself needs: where the files live and where the
/// ledger is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorConfig {
    pub directory: PathBuf,
    pub table: TableName,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self { directory: PathBuf::from(DEFAULT_MIGRATION_DIR), table: TableName::default() }
    }
}
