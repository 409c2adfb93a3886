//! Error type for `ontoload-ols`.
//!
//! Only client construction fails with this type; lookups report
//! [`SourceError`](ontoload_core::SourceError).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid OLS base URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("HTTP client error: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
