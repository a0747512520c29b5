//! Core types for migrun
//!
//! Domain types, configuration values, the migration source reader and the
//! pending-migration selector. Nothing in this crate talks to a database.

mod config;
mod constants;
mod error;
mod migration;
mod source;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use migration::*;
pub use source::read_migrations;
