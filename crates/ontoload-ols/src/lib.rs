//! HTTP client for the Ontology Lookup Service (OLS) REST API.
//!
//! [`OlsClient`] implements [`OntologySource`](ontoload_core::source::OntologySource):
//! it pages through the HAL collections the API returns and flattens the
//! wire JSON into the core remote DTOs. Retrying is left to the caller.

mod client;
mod wire;

pub mod error;

pub use client::{OlsClient, OlsConfig};
pub use error::{Error, Result};
pub use ontoload_core::source::DEFAULT_OLS_API_URL;
