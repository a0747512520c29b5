//! Service layer for migrun
//!
//! The transactional applier and the `Migrator` that sequences a run:
//! bootstrap the tracking table, read what is applied, read the directory,
//! select what is pending, apply it in one transaction.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]

mod applier;
mod error;
mod migrator;
#[cfg(test)]
mod tests;

pub use applier::apply_batch;
pub use error::MigrateError;
pub use migrator::{Migrator, StatusReport};
