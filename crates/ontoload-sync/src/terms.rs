//! Term synchroniser.
//!
//! A term's subsets, alternative ids, synonyms, relations and ancestors
//! are only synchronised when the term row is created. Meeting a known term
//! again (as another term's relative, say) stops the walk there, which
//! bounds the recursion on graphs with cycles and shared ancestors.

use std::{collections::HashSet, future::Future, pin::Pin};

use ontoload_core::{
  Error as CoreError,
  entity::{AltId, Ontology, Subset, Synonym, SynonymType, Term},
  field::Fields,
  mapper::{SUBSET_FIELDS, TERM_FIELDS, map_fields},
  remote::{RemoteOntology, RemoteTerm},
  source::OntologySource,
  text::{humanize, underscore},
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
  Result,
  loader::{OntologyLoader, require_identifier},
};

pub(crate) type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Which ontology row a term belongs to.
#[derive(Debug, Clone)]
pub enum OntologyRef<'a> {
  /// A remote identifier; the ontology is fetched and loaded under the
  /// term's namespace.
  Name(&'a str),
  /// An ontology row already in the store.
  Local(Ontology),
  /// Remote ontology detail; its `(NAME, term namespace)` row is
  /// get-or-created without another remote call.
  Remote(&'a RemoteOntology),
}

/// Terms loaded and ignored by [`OntologyLoader::load_ontology_terms`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadCounts {
  pub loaded:  usize,
  pub ignored: usize,
}

impl<S: OntologySource> OntologyLoader<S> {
  /// Synchronise one remote term into `ontology`.
  ///
  /// `Ok(None)` when the term has no accession. On creation the term's
  /// annotations are loaded, then its relations (when its ontology is
  /// allowed and both the option and `process_relations` are on) and its
  /// ancestors (unless it is a root or parent processing is off).
  pub fn load_term<'a>(
    &'a self,
    remote: &'a RemoteTerm,
    ontology: OntologyRef<'a>,
    process_relations: bool,
  ) -> LocalBoxFuture<'a, Result<Option<Term>>> {
    Box::pin(async move {
      if let OntologyRef::Name(name) = &ontology {
        require_identifier(name)?;
      }
      let ontology = self.resolve_ontology(remote, ontology).await?;

      let Some(accession) = remote.accession() else {
        info!(iri = %remote.iri, "term has no accession, skipped");
        return Ok(None);
      };

      let mut values = map_fields(TERM_FIELDS, remote);
      if values.get("definition").is_none() {
        values.set("definition", humanize(&remote.label));
      }
      if values.get("name").is_none() {
        values.set("name", accession.clone());
      }
      values.set("ontology_id", ontology.id);

      let (term, created) = self
        .store
        .update_or_create::<Term>(Fields::new().with("accession", accession), values)
        .await?;
      info!(
        accession = %term.accession,
        namespace = remote.namespace(),
        created,
        "term loaded"
      );

      if created {
        self.load_term_subsets(&term).await?;
        self.load_alt_ids(&term, remote).await?;
        self.load_term_synonyms(&term, remote).await?;
        if process_relations
          && self.config.process_relations
          && self.config.is_allowed(&remote.ontology_name)
        {
          self.load_term_relations(&term, remote).await?;
        }
        if !term.is_root && self.config.process_parents {
          self.load_term_ancestors(&term, remote).await?;
        }
      }
      Ok(Some(term))
    })
  }

  async fn resolve_ontology(&self, remote: &RemoteTerm, ontology: OntologyRef<'_>) -> Result<Ontology> {
    match ontology {
      OntologyRef::Name(name) => Ok(self.load_ontology(name, Some(remote.namespace())).await?.ontology),
      OntologyRef::Local(ontology) => Ok(ontology),
      OntologyRef::Remote(detail) => {
        let (ontology, _) = self
          .namespaced_ontology(
            detail.name(),
            remote.namespace(),
            detail.version.as_deref(),
            detail.title.as_deref(),
          )
          .await?;
        Ok(ontology)
      }
    }
  }

  /// Load the terms of ontology `name`, optionally only `[start, end)` of
  /// the remote term list.
  ///
  /// The end bound is clamped to the list length. When the clamped end
  /// falls before `start` nothing is written and `None` is returned.
  /// Terms not defined by the ontology, or without accession, are counted
  /// as ignored. Rows are committed as they are written, never across a
  /// call to the source.
  pub async fn load_ontology_terms(
    &self,
    name: &str,
    start: Option<usize>,
    end: Option<usize>,
  ) -> Result<Option<LoadCounts>> {
    let name = require_identifier(name)?;
    let detail = self.source.ontology(name).await?;
    let current = detail.name();
    let mut terms = self.source.ontology_terms(name).await?;

    if start.is_some() || end.is_some() {
      let len = terms.len();
      let start = start.unwrap_or(0);
      let stop = end.unwrap_or(len).min(len);
      info!(ontology = %current, start, end = ?end, resolved = stop, "loading term slice");
      if stop < start {
        warn!(ontology = %current, start, stop, "inverted slice, skipped");
        return Ok(None);
      }
      terms.truncate(stop);
      terms.drain(..start);
    } else {
      info!(ontology = %current, terms = terms.len(), "loading all terms");
    }

    // Each write commits on its own. The write lock must never be held
    // across a source call, or sibling slice workers time out waiting.
    let mut counts = LoadCounts::default();
    for term in &terms {
      if !(term.is_defining_ontology && term.has_accession()) {
        debug!(iri = %term.iri, defining = term.is_defining_ontology, "term ignored");
        counts.ignored += 1;
        continue;
      }
      let (ontology, _) = self
        .namespaced_ontology(
          current.clone(),
          term.namespace(),
          detail.version.as_deref(),
          detail.title.as_deref(),
        )
        .await?;
      if self.load_term(term, OntologyRef::Local(ontology), true).await?.is_some() {
        counts.loaded += 1;
      }
    }

    info!(
      target: "ontoload::report",
      ontology = %current,
      loaded = counts.loaded,
      ignored = counts.ignored,
      "terms loaded"
    );
    Ok(Some(counts))
  }

  // ─── Annotations ───────────────────────────────────────────────────────────

  /// Create the subsets `term` is tagged with. Returns how many were new.
  ///
  /// New subsets get a definition derived from their label, then the
  /// property detail's definition when the source has one. Failing to
  /// fetch that detail is logged and otherwise ignored.
  pub async fn load_term_subsets(&self, term: &Term) -> Result<usize> {
    let Some(subsets) = term.subsets.as_deref().filter(|s| !s.is_empty()) else {
      debug!(accession = %term.accession, "no subset");
      return Ok(0);
    };

    let found = self.source.search_properties(subsets).await?;
    let mut seen = HashSet::new();
    let mut created_count = 0;
    for property in found {
      if property.label.is_empty() || !seen.insert(property.short_form.to_lowercase()) {
        continue;
      }
      let (subset, created) = self
        .store
        .get_or_create::<Subset>(
          Fields::new().with("name", underscore(&property.label)),
          Fields::new().with("definition", humanize(&property.label)),
        )
        .await?;
      if !created {
        continue;
      }
      created_count += 1;
      info!(subset = %subset.name, "subset created");
      match self.source.property(&property.iri).await {
        Ok(detail) => {
          let values = map_fields(SUBSET_FIELDS, &detail);
          if values.is_empty() {
            warn!(subset = %subset.name, "subset detail has no definition");
          } else {
            self.store.update::<Subset>(subset.id, values).await?;
          }
        }
        Err(e) => error!(subset = %subset.name, error = %e, "subset detail unavailable"),
      }
    }
    Ok(created_count)
  }

  /// Replace the alternative ids of `term` with the remote ones.
  pub async fn load_alt_ids(&self, term: &Term, remote: &RemoteTerm) -> Result<usize> {
    self
      .store
      .delete_where::<AltId>(Fields::new().with("term_id", term.id))
      .await?;
    let mut count = 0;
    for accession in &remote.alternative_ids {
      let (_, created) = self
        .store
        .get_or_create::<AltId>(
          Fields::new().with("term_id", term.id).with("accession", accession),
          Fields::new(),
        )
        .await?;
      if created {
        count += 1;
      }
    }
    debug!(accession = %term.accession, count, "alt ids loaded");
    Ok(count)
  }

  /// Replace the synonyms of `term` with the remote ones. OBO synonyms
  /// come first so their scope and cross reference win over the plain
  /// (EXACT) and related (RELATED) lists. Returns how many were created.
  pub async fn load_term_synonyms(&self, term: &Term, remote: &RemoteTerm) -> Result<usize> {
    self
      .store
      .delete_where::<Synonym>(Fields::new().with("term_id", term.id))
      .await?;

    let mut count = 0;
    for synonym in &remote.obo_synonyms {
      let Some(kind) = SynonymType::from_obo_scope(&synonym.scope) else {
        let e = CoreError::UnknownSynonymScope(synonym.scope.clone());
        error!(accession = %term.accession, synonym = %synonym.name, error = %e, "synonym skipped");
        continue;
      };
      let db_xref = synonym.db_xref();
      let db_xref = (!db_xref.is_empty()).then_some(db_xref);
      count += self.put_synonym(term, &synonym.name, kind, db_xref).await? as usize;
    }
    for name in &remote.synonyms {
      count += self.put_synonym(term, name, SynonymType::Exact, None).await? as usize;
    }
    for name in &remote.related_synonyms {
      count += self.put_synonym(term, name, SynonymType::Related, None).await? as usize;
    }
    debug!(accession = %term.accession, count, "synonyms loaded");
    Ok(count)
  }

  async fn put_synonym(
    &self,
    term: &Term,
    name: &str,
    kind: SynonymType,
    db_xref: Option<String>,
  ) -> Result<bool> {
    let (_, created) = self
      .store
      .get_or_create::<Synonym>(
        Fields::new().with("term_id", term.id).with("name", name),
        Fields::new().with("type", kind.to_string()).with("dbxref", db_xref),
      )
      .await?;
    Ok(created)
  }
}
