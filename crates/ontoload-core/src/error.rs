//! Error types for `ontoload-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown synonym type: {0:?}")]
  UnknownSynonymType(String),

  #[error("unknown synonym scope: {0:?}")]
  UnknownSynonymScope(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures reported by an [`OntologySource`](crate::source::OntologySource).
///
/// Only [`SourceError::is_transient`] errors are retried by the fetcher; the
/// rest surface to the caller on the first attempt.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
  /// The remote entity does not exist.
  #[error("not found: {0}")]
  NotFound(String),

  /// Connection, timeout or other transport-level failure.
  #[error("network error: {0}")]
  Network(String),

  /// The server answered with an unexpected status.
  #[error("HTTP {status} from {url}")]
  Http { status: u16, url: String },

  /// The term exposes no data for the requested relation kind.
  #[error("no {relation} data for term {term}")]
  NoRelationData { term: String, relation: String },

  /// The response body could not be decoded.
  #[error("decode error: {0}")]
  Decode(String),
}

impl SourceError {
  /// Whether retrying the same call may succeed.
  pub fn is_transient(&self) -> bool {
    match self {
      Self::Network(_) => true,
      Self::Http { status, .. } => *status == 429 || *status >= 500,
      _ => false,
    }
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}
