//! SQLite backend for the ontology loader.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every entity write goes
//! through the get-or-create engine in [`upsert`].

mod encode;
mod schema;
mod store;
mod upsert;

pub mod error;
pub mod record;

pub use error::{Error, Result};
pub use record::Record;
pub use store::{OntologyReport, PurgeCounts, SqliteStore};

#[cfg(test)]
mod tests;
