//! PHI-base identifier loader.
//!
//! PHI-base identifiers have no remote term list: `PHI:0` is a root named
//! after the namespace and every other `PHI:<n>` is an `is_a` child of it.
//! Large ranges are loaded in chunks; only the chunk starting at 0 clears
//! the previous load.

use ontoload_core::{
  entity::{Ontology, Relation, Term},
  field::Fields,
  source::OntologySource,
};
use tracing::{debug, info};

use crate::{Error, Result, loader::OntologyLoader};

pub const PHI_ONTOLOGY: &str = "PHI";
pub const PHI_NAMESPACE: &str = "phibase_identifier";
const PHI_ROOT: &str = "PHI:0";
const PHI_VERSION: &str = "1.0";
const PHI_TITLE: &str = "PHI-base Identifiers";

impl<S: OntologySource> OntologyLoader<S> {
  /// Create identifiers `PHI:<start>` through `PHI:<end>` (inclusive).
  /// Returns the number of terms created.
  pub async fn load_phibase_identifiers(&self, start: u32, end: u32) -> Result<usize> {
    let commit_every = u32::try_from(self.config.commit_every).unwrap_or(u32::MAX).max(1);
    self
      .store
      .scope(async || -> Result<usize> {
        let (ontology, _) = self
          .store
          .update_or_create::<Ontology>(
            Fields::new().with("name", PHI_ONTOLOGY).with("namespace", PHI_NAMESPACE),
            Fields::new().with("data_version", PHI_VERSION).with("title", PHI_TITLE),
          )
          .await?;
        if start == 0 {
          let purged = self.store.purge_ontology_terms(ontology.id).await?;
          info!(terms = purged.terms, relations = purged.relations, "previous identifiers removed");
        }
        let is_a = self.relation_type("is_a").await?;

        let mut created_count = 0;
        let root = if start == 0 {
          let (root, created) = self
            .store
            .get_or_create::<Term>(
              Fields::new().with("accession", PHI_ROOT),
              Fields::new()
                .with("ontology_id", ontology.id)
                .with("name", "phibase identifier")
                .with("is_root", true),
            )
            .await?;
          created_count += usize::from(created);
          root
        } else {
          self
            .store
            .find::<Term>(Fields::new().with("accession", PHI_ROOT))
            .await?
            .ok_or_else(|| Error::MissingRoot(PHI_ROOT.to_owned()))?
        };

        for i in start.max(1)..=end {
          let (term, created) = self
            .store
            .get_or_create::<Term>(
              Fields::new().with("accession", format!("PHI:{i}")),
              Fields::new().with("ontology_id", ontology.id).with("name", i.to_string()),
            )
            .await?;
          created_count += usize::from(created);
          self
            .store
            .get_or_create::<Relation>(
              Fields::new()
                .with("child_term_id", term.id)
                .with("parent_term_id", root.id)
                .with("relation_type_id", is_a.id)
                .with("intersection_of", false)
                .with("ontology_id", ontology.id),
              Fields::new(),
            )
            .await?;
          if i % commit_every == 0 {
            debug!(last = %term.accession, "checkpoint");
            self.store.checkpoint().await?;
          }
        }
        info!(start, end, created = created_count, "PHI-base identifiers loaded");
        Ok(created_count)
      })
      .await
  }
}
