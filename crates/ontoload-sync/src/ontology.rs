//! Ontology synchroniser: schema metas, ontology rows and their load
//! timestamps, and the full wipe.

use chrono::Local;
use ontoload_core::{
  entity::Ontology,
  field::Fields,
  mapper::{ONTOLOGY_FIELDS, map_fields},
  remote::RemoteOntology,
  source::OntologySource,
};
use tracing::{debug, info, warn};

use crate::{
  Result,
  loader::{OntologyLoader, require_identifier},
};

/// Outcome of [`OntologyLoader::load_ontology`].
#[derive(Debug, Clone)]
pub struct LoadedOntology {
  pub ontology: Ontology,
  pub remote:   RemoteOntology,
  /// Whether the `(name, namespace)` row was created by this load.
  pub created:  bool,
}

impl<S: OntologySource> OntologyLoader<S> {
  /// Create the schema and record its release in the meta table.
  pub async fn init_schema(&self) -> Result<()> {
    self.store.init_schema().await?;
    let version = self.config.db_version;
    self
      .store
      .scope(async || -> Result<()> {
        self.put_meta("schema_version".into(), version.to_string()).await?;
        self.put_meta("schema_type".into(), "ontology".into()).await?;
        self
          .put_meta(
            "patch".into(),
            format!("patch_{}_{}_a.sql|schema version", version.saturating_sub(1), version),
          )
          .await?;
        Ok(())
      })
      .await?;
    info!(version, "schema initialised");
    Ok(())
  }

  /// Fetch ontology `identifier` and synchronise it; see
  /// [`load_remote_ontology`](Self::load_remote_ontology).
  pub async fn load_ontology(&self, identifier: &str, namespace: Option<&str>) -> Result<LoadedOntology> {
    let identifier = require_identifier(identifier)?;
    let remote = self.source.ontology(identifier).await?;
    self.load_remote_ontology(&remote, namespace).await
  }

  /// Upsert the `(NAME, namespace)` ontology row from `remote`, refreshing
  /// its version and title, and stamp the `<NAME>_load_date` and
  /// `<NAME>_file_date` meta rows. `namespace` defaults to the remote one.
  pub async fn load_remote_ontology(
    &self,
    remote: &RemoteOntology,
    namespace: Option<&str>,
  ) -> Result<LoadedOntology> {
    let name = remote.name();
    let namespace = namespace
      .filter(|ns| !ns.is_empty())
      .unwrap_or_else(|| remote.default_namespace())
      .to_owned();

    self
      .store
      .scope(async || -> Result<LoadedOntology> {
        let key = Fields::new().with("name", name.clone()).with("namespace", namespace.clone());
        let values = map_fields(ONTOLOGY_FIELDS, remote).merge(key.clone());
        let (ontology, created) = self.store.update_or_create::<Ontology>(key, values).await?;

        if created {
          info!(
            target: "ontoload::report",
            ontology = %ontology.name,
            namespace = %ontology.namespace,
            title = ontology.title.as_deref().unwrap_or_default(),
            terms = remote.number_of_terms,
            properties = remote.number_of_properties,
            individuals = remote.number_of_individuals,
            "ontology loaded"
          );
        } else {
          debug!(ontology = %ontology.name, namespace = %ontology.namespace, "ontology refreshed");
        }

        let now = Local::now();
        self
          .put_meta(format!("{name}_load_date"), format!("{name}/{}", now.format("%c")))
          .await?;

        let updated = match remote.updated_at() {
          Some(at) => at.format("%c").to_string(),
          None => {
            if let Some(raw) = remote.updated.as_deref() {
              warn!(ontology = %name, updated = raw, "unparseable update date, using now");
            }
            now.format("%c").to_string()
          }
        };
        self
          .put_meta(format!("{name}_file_date"), format!("{name}/{updated}"))
          .await?;

        Ok(LoadedOntology { ontology, remote: remote.clone(), created })
      })
      .await
  }

  /// Remove every row belonging to ontology `name`, in all its namespaces,
  /// plus the meta rows mentioning it. `false` when nothing matched.
  pub async fn wipe_ontology(&self, name: &str) -> Result<bool> {
    let name = require_identifier(name)?;
    info!(ontology = name, "wiping ontology");
    Ok(self.store.wipe_ontology(name).await?)
  }
}
