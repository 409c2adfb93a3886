//! Remote DTOs — what an [`OntologySource`](crate::source::OntologySource)
//! returns, already flattened out of the wire format.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ─── Ontology ────────────────────────────────────────────────────────────────

/// Detail of a remote ontology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteOntology {
  /// Short identifier as known remotely (`go`, `efo`, ...).
  pub ontology_id:           String,
  /// Default namespace declared by the ontology configuration.
  pub namespace:             Option<String>,
  pub version:               Option<String>,
  pub title:                 Option<String>,
  /// Last-modified timestamp, as sent by the server.
  pub updated:               Option<String>,
  pub number_of_terms:       u64,
  pub number_of_properties:  u64,
  pub number_of_individuals: u64,
}

impl RemoteOntology {
  /// The local ontology name (upper-cased identifier).
  pub fn name(&self) -> String { self.ontology_id.to_uppercase() }

  /// Namespace to use when none is requested explicitly.
  pub fn default_namespace(&self) -> &str {
    self
      .namespace
      .as_deref()
      .filter(|ns| !ns.is_empty())
      .unwrap_or(&self.ontology_id)
  }

  /// Parse [`Self::updated`]. `None` when absent or malformed.
  pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
    let raw = self.updated.as_deref()?;
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
      .or_else(|_| DateTime::parse_from_rfc3339(raw))
      .ok()
  }
}

// ─── Term ────────────────────────────────────────────────────────────────────

/// An OBO-style synonym with scope and cross references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OboSynonym {
  pub name:  String,
  /// `hasExactSynonym`, `hasBroadSynonym`, ...
  pub scope: String,
  pub xrefs: Vec<OboXref>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OboXref {
  pub database: Option<String>,
  pub id:       Option<String>,
}

impl OboSynonym {
  /// `database:id` of the first cross reference, or an empty string.
  pub fn db_xref(&self) -> String {
    match self.xrefs.first() {
      Some(x) => format!(
        "{}:{}",
        x.database.as_deref().unwrap_or_default(),
        x.id.as_deref().unwrap_or_default()
      ),
      None => String::new(),
    }
  }
}

/// Detail of a remote term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteTerm {
  pub iri:                  String,
  pub label:                String,
  pub description:          Vec<String>,
  /// `PREFIX:NUMBER` when the server provides one.
  pub obo_id:               Option<String>,
  /// `PREFIX_NUMBER` form of the identifier.
  pub short_form:           Option<String>,
  /// Owning remote ontology identifier.
  pub ontology_name:        String,
  /// Namespace declared on the term (`has_obo_namespace`).
  pub obo_namespace:        Option<String>,
  pub is_obsolete:          bool,
  pub is_root:              bool,
  pub is_defining_ontology: bool,
  pub in_subset:            Vec<String>,
  pub synonyms:             Vec<String>,
  pub obo_synonyms:         Vec<OboSynonym>,
  pub related_synonyms:     Vec<String>,
  pub alternative_ids:      Vec<String>,
  /// Relation kind → link to follow for the related terms.
  pub links:                BTreeMap<String, String>,
}

impl RemoteTerm {
  /// The term accession: `obo_id`, else the short form with its first `_`
  /// turned into `:`.
  pub fn accession(&self) -> Option<String> {
    if let Some(id) = self.obo_id.as_deref().filter(|id| !id.is_empty()) {
      return Some(id.to_owned());
    }
    let short = self.short_form.as_deref()?;
    let (prefix, local) = short.split_once('_')?;
    if prefix.is_empty() || local.is_empty() {
      return None;
    }
    Some(format!("{prefix}:{local}"))
  }

  pub fn has_accession(&self) -> bool { self.accession().is_some() }

  /// The term namespace, falling back to the owning ontology name.
  pub fn namespace(&self) -> &str {
    self
      .obo_namespace
      .as_deref()
      .filter(|ns| !ns.is_empty())
      .unwrap_or(&self.ontology_name)
  }

  /// Comma-joined subset names, if any.
  pub fn subsets(&self) -> Option<String> {
    (!self.in_subset.is_empty()).then(|| self.in_subset.join(","))
  }

  /// Single-line description, if the server sent one.
  pub fn description_text(&self) -> Option<String> {
    let joined = self
      .description
      .iter()
      .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
      .filter(|d| !d.is_empty())
      .collect::<Vec<_>>()
      .join(" ");
    (!joined.is_empty()).then_some(joined)
  }

  /// Relation kinds this term links to.
  pub fn relation_types(&self) -> impl Iterator<Item = &str> + '_ {
    self.links.keys().map(String::as_str).filter(|k| *k != "self")
  }
}

// ─── Property ────────────────────────────────────────────────────────────────

/// A remote annotation property (used for subset definitions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProperty {
  pub iri:        String,
  pub label:      String,
  pub short_form: String,
  pub definition: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn term(obo_id: Option<&str>, short_form: Option<&str>) -> RemoteTerm {
    RemoteTerm {
      obo_id: obo_id.map(Into::into),
      short_form: short_form.map(Into::into),
      ..Default::default()
    }
  }

  #[test]
  fn accession_prefers_obo_id() {
    assert_eq!(
      term(Some("GO:0005575"), Some("GO_0005575")).accession().as_deref(),
      Some("GO:0005575")
    );
  }

  #[test]
  fn accession_falls_back_to_short_form() {
    assert_eq!(term(None, Some("PR_P68993")).accession().as_deref(), Some("PR:P68993"));
    assert_eq!(term(None, Some("Thing")).accession(), None);
    assert_eq!(term(None, None).accession(), None);
  }

  #[test]
  fn description_is_flattened_to_one_line() {
    let t = RemoteTerm {
      description: vec!["A cellular\n process.".into(), "  ".into()],
      ..Default::default()
    };
    assert_eq!(t.description_text().as_deref(), Some("A cellular process."));
    assert_eq!(RemoteTerm::default().description_text(), None);
  }

  #[test]
  fn namespace_falls_back_to_ontology_name() {
    let mut t = RemoteTerm { ontology_name: "efo".into(), ..Default::default() };
    assert_eq!(t.namespace(), "efo");
    t.obo_namespace = Some("biological_process".into());
    assert_eq!(t.namespace(), "biological_process");
  }

  #[test]
  fn updated_timestamp_parses_or_is_none() {
    let mut o = RemoteOntology {
      updated: Some("2019-05-09T10:12:13.456+0000".into()),
      ..Default::default()
    };
    assert!(o.updated_at().is_some());
    o.updated = Some("yesterday".into());
    assert!(o.updated_at().is_none());
  }

  #[test]
  fn first_xref_becomes_db_xref() {
    let syn = OboSynonym {
      name:  "x".into(),
      scope: "hasExactSynonym".into(),
      xrefs: vec![OboXref { database: Some("PMID".into()), id: Some("123".into()) }],
    };
    assert_eq!(syn.db_xref(), "PMID:123");
    assert_eq!(OboSynonym::default().db_xref(), "");
  }
}
