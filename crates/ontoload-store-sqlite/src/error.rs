//! Error type for `ontoload-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A row expected to exist (e.g. right after a constraint violation) was
  /// not found.
  #[error("{table} row not found for {key}")]
  RowNotFound { table: &'static str, key: String },
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { Self::Database(tokio_rusqlite::Error::Rusqlite(e)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
