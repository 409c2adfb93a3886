//! The `OntologySource` trait — the remote ontology lookup service.
//!
//! Implemented by the OLS HTTP client (`ontoload-ols`) and wrapped by the
//! retrying fetcher in `ontoload-sync`. The synchronisers depend on this
//! abstraction, not on any concrete client.

use crate::{
  error::SourceError,
  remote::{RemoteOntology, RemoteProperty, RemoteTerm},
};

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// The public EBI OLS4 REST API.
pub const DEFAULT_OLS_API_URL: &str = "https://www.ebi.ac.uk/ols4/api";

pub trait OntologySource {
  /// Detail of one ontology. [`SourceError::NotFound`] when unknown.
  async fn ontology(&self, identifier: &str) -> SourceResult<RemoteOntology>;

  /// Every term of an ontology, in server order. Pagination is the
  /// implementation's concern.
  async fn ontology_terms(&self, identifier: &str) -> SourceResult<Vec<RemoteTerm>>;

  /// Detail of a term looked up by IRI, preferring the ontology that
  /// defines it.
  async fn term(&self, iri: &str) -> SourceResult<RemoteTerm>;

  /// Terms reached from `term` through the `relation` link.
  /// [`SourceError::NoRelationData`] when the term exposes no such link.
  async fn term_relatives(
    &self,
    term: &RemoteTerm,
    relation: &str,
  ) -> SourceResult<Vec<RemoteTerm>>;

  /// Annotation properties matching a free-text query.
  async fn search_properties(&self, query: &str) -> SourceResult<Vec<RemoteProperty>>;

  /// Detail of one annotation property looked up by IRI.
  async fn property(&self, iri: &str) -> SourceResult<RemoteProperty>;
}
