//! Error type for `ontoload-sync`.

use ontoload_core::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The remote source failed, after any retries.
  #[error("remote source: {0}")]
  Source(#[from] SourceError),

  #[error("store: {0}")]
  Store(#[from] ontoload_store_sqlite::Error),

  /// The caller passed an argument no lookup can succeed with.
  #[error("invalid parameter: {0}")]
  InvalidParameter(String),

  /// A continuation chunk of PHI-base identifiers ran before the first one.
  #[error("root term {0} is missing; load the first chunk first")]
  MissingRoot(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
