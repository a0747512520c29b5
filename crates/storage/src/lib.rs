//! Storage layer for migrun
//!
//! The tracking-table protocol and the transactional handle used by the
//! applier, expressed as traits, plus the PostgreSQL implementation and the
//! driver-keyed connector registry.

mod connector;
pub mod error;
mod pg_store;
pub mod traits;

pub use connector::{connector_for, supported_drivers, Connector, PostgresConnector};
pub use error::{ConnectError, TrackingError};
pub use pg_store::{PgMigrationStore, PgMigrationTx};
pub use traits::{MigrationStore, MigrationTx};
