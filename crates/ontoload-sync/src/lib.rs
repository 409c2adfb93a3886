//! Synchronisers that mirror remote ontologies into the relational store.
//!
//! [`OntologyLoader`] owns a [`SqliteStore`](ontoload_store_sqlite::SqliteStore)
//! handle, a remote [`OntologySource`](ontoload_core::source::OntologySource)
//! wrapped in the retrying fetcher, and an immutable [`LoaderConfig`]. Each
//! public operation is one unit of work and runs in its own transaction
//! scope, joining the caller's scope when one is already open.

pub mod config;
pub mod error;
pub mod fetch;

mod loader;
mod ontology;
mod phibase;
mod relations;
mod report;
mod terms;

pub use config::LoaderConfig;
pub use error::{Error, Result};
pub use fetch::{RetryPolicy, RetryingSource, call_with_retry};
pub use loader::OntologyLoader;
pub use ontology::LoadedOntology;
pub use phibase::{PHI_NAMESPACE, PHI_ONTOLOGY};
pub use terms::{LoadCounts, OntologyRef};
