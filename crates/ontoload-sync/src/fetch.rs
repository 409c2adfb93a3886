//! The retrying remote fetcher.
//!
//! Transient failures (see [`SourceError::is_transient`]) are retried after
//! a fixed delay, up to a bounded number of attempts; the last error is
//! returned once the attempts are spent. Every other failure, not-found
//! included, is returned on the first attempt.

use std::time::Duration;

use ontoload_core::{
  SourceError,
  remote::{RemoteOntology, RemoteProperty, RemoteTerm},
  source::{OntologySource, SourceResult},
};
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts, the first one included.
  pub max_retry: u32,
  pub delay:     Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self { Self { max_retry: 5, delay: Duration::from_secs(5) } }
}

/// Run `call` until it succeeds, fails permanently, or `policy` runs out of
/// attempts. `operation` names the call in logs.
pub async fn call_with_retry<T, F, Fut>(
  policy: &RetryPolicy,
  operation: &str,
  mut call: F,
) -> SourceResult<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = SourceResult<T>>,
{
  let attempts = policy.max_retry.max(1);
  let mut attempt = 1;
  loop {
    match call().await {
      Ok(value) => return Ok(value),
      Err(e) if e.is_transient() && attempt < attempts => {
        warn!(operation, attempt, attempts, error = %e, "transient failure, retrying");
        tokio::time::sleep(policy.delay).await;
        attempt += 1;
      }
      Err(e) => {
        if e.is_transient() {
          error!(operation, attempts, error = %e, "giving up");
        }
        return Err(e);
      }
    }
  }
}

/// An [`OntologySource`] whose every call goes through [`call_with_retry`].
#[derive(Debug, Clone)]
pub struct RetryingSource<S> {
  inner:  S,
  policy: RetryPolicy,
}

impl<S> RetryingSource<S> {
  pub fn new(inner: S, policy: RetryPolicy) -> Self { Self { inner, policy } }

  pub fn inner(&self) -> &S { &self.inner }
}

impl<S: OntologySource> OntologySource for RetryingSource<S> {
  async fn ontology(&self, identifier: &str) -> SourceResult<RemoteOntology> {
    call_with_retry(&self.policy, "ontology", || self.inner.ontology(identifier)).await
  }

  async fn ontology_terms(&self, identifier: &str) -> SourceResult<Vec<RemoteTerm>> {
    call_with_retry(&self.policy, "ontology_terms", || self.inner.ontology_terms(identifier)).await
  }

  async fn term(&self, iri: &str) -> SourceResult<RemoteTerm> {
    call_with_retry(&self.policy, "term", || self.inner.term(iri)).await
  }

  async fn term_relatives(&self, term: &RemoteTerm, relation: &str) -> SourceResult<Vec<RemoteTerm>> {
    call_with_retry(&self.policy, "term_relatives", || self.inner.term_relatives(term, relation)).await
  }

  async fn search_properties(&self, query: &str) -> SourceResult<Vec<RemoteProperty>> {
    call_with_retry(&self.policy, "search_properties", || self.inner.search_properties(query)).await
  }

  async fn property(&self, iri: &str) -> SourceResult<RemoteProperty> {
    call_with_retry(&self.policy, "property", || self.inner.property(iri)).await
  }
}

/// Whether `e` means the term simply has no such relation.
pub(crate) fn is_no_relation_data(e: &SourceError) -> bool {
  matches!(e, SourceError::NoRelationData { .. })
}
