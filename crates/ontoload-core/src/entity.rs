//! Local entities — one struct per table of the ontology schema.
//!
//! Rows are identified by an integer surrogate key assigned by the store.
//! Natural keys (the combination used for get-or-create) are documented on
//! each type.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ─── Ontology ────────────────────────────────────────────────────────────────

/// One namespace of a remote ontology.
///
/// Natural key: `(name, namespace)`. The same remote ontology (e.g. GO) is
/// split into several rows, one per namespace met among its terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ontology {
  pub id:        i64,
  /// Remote ontology identifier, always upper-cased.
  pub name:      String,
  pub namespace: String,
  pub version:   Option<String>,
  pub title:     Option<String>,
}

// ─── Term ────────────────────────────────────────────────────────────────────

/// A single concept within an ontology namespace.
///
/// Natural key: `accession` (`PREFIX:NUMBER`), globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
  pub id:          i64,
  pub ontology_id: i64,
  pub accession:   String,
  pub name:        String,
  pub description: Option<String>,
  /// Comma-joined subset names.
  pub subsets:     Option<String>,
  pub is_root:     bool,
  pub is_obsolete: bool,
  pub iri:         Option<String>,
}

// ─── Relations ───────────────────────────────────────────────────────────────

/// Natural key: `name` (e.g. `is_a`, `part_of`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationType {
  pub id:   i64,
  pub name: String,
}

/// A directed typed edge: `child_term_id <relation_type> parent_term_id`.
///
/// The term the relation was discovered from is always the child; the
/// ontology is the one owning that term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
  pub id:               i64,
  pub child_term_id:    i64,
  pub parent_term_id:   i64,
  pub relation_type_id: i64,
  pub intersection_of:  bool,
  pub ontology_id:      i64,
}

/// Transitive closure row. Computed by an external tool; the loader only
/// deletes these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Closure {
  pub id:                     i64,
  pub child_term_id:          i64,
  pub parent_term_id:         i64,
  pub subparent_term_id:      Option<i64>,
  pub distance:               i64,
  pub ontology_id:            i64,
  pub confident_relationship: bool,
}

// ─── Term annotations ────────────────────────────────────────────────────────

/// Classification of a synonym, stored as its upper-case name.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SynonymType {
  Exact,
  Broad,
  Narrow,
  Related,
}

impl SynonymType {
  /// Map an OBO synonym scope (`hasExactSynonym`, ...) to its type.
  pub fn from_obo_scope(scope: &str) -> Option<Self> {
    match scope {
      "hasExactSynonym" => Some(Self::Exact),
      "hasBroadSynonym" => Some(Self::Broad),
      "hasNarrowSynonym" => Some(Self::Narrow),
      "hasRelatedSynonym" => Some(Self::Related),
      _ => None,
    }
  }
}

/// Natural key: `(term_id, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
  pub id:      i64,
  pub term_id: i64,
  pub name:    String,
  pub kind:    Option<SynonymType>,
  pub db_xref: Option<String>,
}

/// An accession historically merged into a term. Natural key:
/// `(term_id, accession)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltId {
  pub id:        i64,
  pub term_id:   i64,
  pub accession: String,
}

/// Natural key: `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subset {
  pub id:         i64,
  pub name:       String,
  pub definition: String,
}

// ─── Meta ────────────────────────────────────────────────────────────────────

/// Free-form key/value audit row (load dates, schema version, patches).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
  pub id:         i64,
  pub meta_key:   String,
  pub meta_value: Option<String>,
  pub species_id: Option<i64>,
}
