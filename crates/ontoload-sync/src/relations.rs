//! Relation resolver.
//!
//! The term being synchronised is always the child of the relations it
//! discovers and the related term the parent: `A part_of B` is stored with
//! `child_term_id = A`, `parent_term_id = B`. Relations are scoped to the
//! ontology of the child.

use ontoload_core::{
  entity::{Ontology, Relation, RelationType, Term},
  field::Fields,
  remote::RemoteTerm,
  source::OntologySource,
};
use tracing::{debug, info, warn};

use crate::{
  Result,
  fetch::is_no_relation_data,
  loader::OntologyLoader,
  terms::OntologyRef,
};

/// Link kinds that only navigate the hierarchy and carry no relation.
pub const IGNORED_RELATIONS: &[&str] = &[
  "self",
  "graph",
  "jstree",
  "descendants",
  "ancestors",
  "hierarchicalParents",
  "children",
  "parents",
  "hierarchicalAncestors",
  "hierarchicalChildren",
  "hierarchicalDescendants",
];

/// Local relation type name for a remote link kind.
pub fn relation_name(kind: &str) -> &str {
  match kind {
    "parents" | "children" => "is_a",
    "derives_from" | "develops_from" => "develops_from",
    other => other,
  }
}

impl<S: OntologySource> OntologyLoader<S> {
  /// Synchronise every non-navigational relation of `remote` onto `term`.
  /// Returns the number of relation rows created.
  pub async fn load_term_relations(&self, term: &Term, remote: &RemoteTerm) -> Result<usize> {
    let kinds: Vec<&str> = remote
      .relation_types()
      .filter(|kind| !IGNORED_RELATIONS.contains(kind))
      .collect();
    debug!(accession = %term.accession, ?kinds, "relation kinds");

    let mut created_count = 0;
    for kind in kinds {
      let related = match self.source.term_relatives(remote, kind).await {
        Ok(related) => related,
        Err(e) if is_no_relation_data(&e) => {
          debug!(accession = %term.accession, kind, "no relation data");
          continue;
        }
        Err(e) => return Err(e.into()),
      };
      let rel_type = self.relation_type(relation_name(kind)).await?;
      for other in related.iter().filter(|t| t.has_accession()) {
        if let Some((_, true)) = self.load_term_relation(term, other, &rel_type).await? {
          created_count += 1;
        }
      }
      debug!(accession = %term.accession, kind, related = related.len(), "relations loaded");
    }
    Ok(created_count)
  }

  /// Where a related term belongs.
  ///
  /// A term defined by its own ontology lives beside `term`. A term whose
  /// prefix is not allowed is an external reference and is filed under
  /// `term`'s ontology too. Otherwise its detail and ontology are fetched
  /// and the matching `(NAME, namespace)` row is get-or-created. `None`
  /// when the detail lookup reports the term as unknown.
  pub async fn rel_dest_ontology(
    &self,
    term: &Term,
    related: &RemoteTerm,
  ) -> Result<Option<(RemoteTerm, Ontology)>> {
    if related.is_defining_ontology {
      debug!(iri = %related.iri, "related term defined in the same ontology");
      return Ok(Some((related.clone(), self.term_ontology(term).await?)));
    }
    let Some(accession) = related.accession() else {
      return Ok(None);
    };
    let prefix = accession.split(':').next().unwrap_or_default();
    if !self.config.is_allowed(prefix) {
      debug!(iri = %related.iri, prefix, "related term defined in an external ontology");
      return Ok(Some((related.clone(), self.term_ontology(term).await?)));
    }

    let detail = match self.source.term(&related.iri).await {
      Ok(detail) => detail,
      Err(e) if e.is_not_found() => {
        warn!(iri = %related.iri, "related term detail not found");
        return Ok(None);
      }
      Err(e) => return Err(e.into()),
    };
    let remote_ontology = self.source.ontology(&detail.ontology_name).await?;
    let (ontology, _) = self
      .namespaced_ontology(
        remote_ontology.name(),
        detail.namespace(),
        remote_ontology.version.as_deref(),
        remote_ontology.title.as_deref(),
      )
      .await?;
    Ok(Some((detail, ontology)))
  }

  /// Link `term` (child) to `related` (parent) with `rel_type`, loading
  /// `related` first when it is not in the store yet. Returns the parent
  /// row and whether the relation row was created.
  pub async fn load_term_relation(
    &self,
    term: &Term,
    related: &RemoteTerm,
    rel_type: &RelationType,
  ) -> Result<Option<(Term, bool)>> {
    let Some(accession) = related.accession() else {
      return Ok(None);
    };

    let parent = match self.store.find::<Term>(Fields::new().with("accession", &accession)).await? {
      Some(existing) => existing,
      None => {
        let Some((detail, ontology)) = self.rel_dest_ontology(term, related).await? else {
          warn!(
            accession = %term.accession,
            relation = %rel_type.name,
            related = %related.iri,
            "related term not found, relation skipped"
          );
          return Ok(None);
        };
        match self.load_term(&detail, OntologyRef::Local(ontology), false).await? {
          Some(loaded) => loaded,
          None => return Ok(None),
        }
      }
    };

    let (_, created) = self
      .store
      .get_or_create::<Relation>(
        Fields::new()
          .with("child_term_id", term.id)
          .with("parent_term_id", parent.id)
          .with("relation_type_id", rel_type.id)
          .with("intersection_of", false)
          .with("ontology_id", term.ontology_id),
        Fields::new(),
      )
      .await?;
    debug!(
      child = %term.accession,
      relation = %rel_type.name,
      parent = %parent.accession,
      created,
      "relation"
    );
    Ok(Some((parent, created)))
  }

  /// Walk the `parents` link of `remote` as `is_a` relations. Parents met
  /// for the first time are loaded, which walks their own ancestors in
  /// turn. A term without parent data has no ancestors.
  pub async fn load_term_ancestors(&self, term: &Term, remote: &RemoteTerm) -> Result<usize> {
    let parents = match self.source.term_relatives(remote, "parents").await {
      Ok(parents) => parents,
      Err(e) if is_no_relation_data(&e) => {
        info!(accession = %term.accession, "no parent");
        return Ok(0);
      }
      Err(e) => return Err(e.into()),
    };

    let is_a = self.relation_type(relation_name("parents")).await?;
    let mut count = 0;
    for parent in parents.iter().filter(|p| p.has_accession()) {
      if self.load_term_relation(term, parent, &is_a).await?.is_some() {
        count += 1;
      }
    }
    debug!(accession = %term.accession, count, "ancestors loaded");
    Ok(count)
  }
}
