//! Shared constants for migrun.

/// Tracking table used when none is configured.
pub const DEFAULT_TRACKING_TABLE: &str = "_migration";

/// Migration directory used when none is configured.
pub const DEFAULT_MIGRATION_DIR: &str = "./migrations";

/// Driver identifier used when none is configured.
pub const DEFAULT_DRIVER: &str = "postgres";

/// Default PostgreSQL port.
pub const DEFAULT_PG_PORT: u16 = 5432;

/// Longest identifier PostgreSQL keeps without truncation (`NAMEDATALEN - 1`).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Migration connection pool: maximum connections.
/// One for the tracker, one for the open transaction.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 2;

/// Migration connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;
