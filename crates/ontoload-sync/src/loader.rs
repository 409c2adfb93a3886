//! [`OntologyLoader`] — the handle every synchroniser hangs off.

use ontoload_core::{
  entity::{Meta, Ontology, RelationType, Term},
  field::Fields,
  source::OntologySource,
};
use ontoload_store_sqlite::SqliteStore;

use crate::{
  Error, Result,
  config::LoaderConfig,
  fetch::RetryingSource,
};

pub struct OntologyLoader<S> {
  pub(crate) store:  SqliteStore,
  pub(crate) source: RetryingSource<S>,
  pub(crate) config: LoaderConfig,
}

impl<S: OntologySource> OntologyLoader<S> {
  /// Wrap `source` in the retrying fetcher configured by `config`.
  pub fn new(store: SqliteStore, source: S, config: LoaderConfig) -> Self {
    let source = RetryingSource::new(source, config.retry_policy());
    Self { store, source, config }
  }

  pub fn store(&self) -> &SqliteStore { &self.store }

  pub fn config(&self) -> &LoaderConfig { &self.config }

  pub fn source(&self) -> &S { self.source.inner() }

  // ─── Shared lookups ────────────────────────────────────────────────────────

  /// Create or overwrite the meta row `key`.
  pub(crate) async fn put_meta(&self, key: String, value: String) -> Result<Meta> {
    let (meta, _) = self
      .store
      .update_or_create(Fields::new().with("meta_key", key), Fields::new().with("meta_value", value))
      .await?;
    Ok(meta)
  }

  pub(crate) async fn relation_type(&self, name: &str) -> Result<RelationType> {
    let (rel_type, _) = self
      .store
      .get_or_create(Fields::new().with("name", name), Fields::new())
      .await?;
    Ok(rel_type)
  }

  /// The ontology row owning `term`.
  pub(crate) async fn term_ontology(&self, term: &Term) -> Result<Ontology> {
    self
      .store
      .find(Fields::new().with("ontology_id", term.ontology_id))
      .await?
      .ok_or_else(|| {
        Error::Store(ontoload_store_sqlite::Error::RowNotFound {
          table: "ontology",
          key:   format!("ontology_id = {}", term.ontology_id),
        })
      })
  }

  /// Get-or-create the `(name, namespace)` ontology row, seeding version
  /// and title on creation.
  pub(crate) async fn namespaced_ontology(
    &self,
    name: String,
    namespace: &str,
    version: Option<&str>,
    title: Option<&str>,
  ) -> Result<(Ontology, bool)> {
    let key = Fields::new().with("name", name).with("namespace", namespace);
    let defaults = Fields::new().with("data_version", version).with("title", title);
    Ok(self.store.get_or_create(key, defaults).await?)
  }
}

/// Reject identifiers no remote lookup can resolve.
pub(crate) fn require_identifier(identifier: &str) -> Result<&str> {
  let trimmed = identifier.trim();
  if trimmed.is_empty() {
    return Err(Error::InvalidParameter("empty ontology identifier".to_owned()));
  }
  Ok(trimmed)
}
