//! [`Record`] — table metadata and row decoding for each entity.
//!
//! The upsert engine is generic over this trait; it is the "entity type"
//! argument of get-or-create.

use ontoload_core::entity::{
  AltId, Closure, Meta, Ontology, Relation, RelationType, Subset, Synonym, Term,
};
use rusqlite::Row;

use crate::encode::decode_synonym_type;

pub trait Record: Sized + Send + 'static {
  const TABLE: &'static str;
  /// Primary key column.
  const ID: &'static str;
  /// Selected columns, in the order [`Record::from_row`] reads them. The
  /// primary key comes first.
  const COLUMNS: &'static [&'static str];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

  fn id(&self) -> i64;
}

impl Record for Ontology {
  const TABLE: &'static str = "ontology";
  const ID: &'static str = "ontology_id";
  const COLUMNS: &'static [&'static str] =
    &["ontology_id", "name", "namespace", "data_version", "title"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      name:      row.get(1)?,
      namespace: row.get(2)?,
      version:   row.get(3)?,
      title:     row.get(4)?,
    })
  }

  fn id(&self) -> i64 { self.id }
}

impl Record for Term {
  const TABLE: &'static str = "term";
  const ID: &'static str = "term_id";
  const COLUMNS: &'static [&'static str] = &[
    "term_id",
    "ontology_id",
    "accession",
    "name",
    "definition",
    "subsets",
    "is_root",
    "is_obsolete",
    "iri",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      ontology_id: row.get(1)?,
      accession:   row.get(2)?,
      name:        row.get(3)?,
      description: row.get(4)?,
      subsets:     row.get(5)?,
      is_root:     row.get(6)?,
      is_obsolete: row.get(7)?,
      iri:         row.get(8)?,
    })
  }

  fn id(&self) -> i64 { self.id }
}

impl Record for RelationType {
  const TABLE: &'static str = "relation_type";
  const ID: &'static str = "relation_type_id";
  const COLUMNS: &'static [&'static str] = &["relation_type_id", "name"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, name: row.get(1)? })
  }

  fn id(&self) -> i64 { self.id }
}

impl Record for Relation {
  const TABLE: &'static str = "relation";
  const ID: &'static str = "relation_id";
  const COLUMNS: &'static [&'static str] = &[
    "relation_id",
    "child_term_id",
    "parent_term_id",
    "relation_type_id",
    "intersection_of",
    "ontology_id",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      child_term_id:    row.get(1)?,
      parent_term_id:   row.get(2)?,
      relation_type_id: row.get(3)?,
      intersection_of:  row.get(4)?,
      ontology_id:      row.get(5)?,
    })
  }

  fn id(&self) -> i64 { self.id }
}

impl Record for Closure {
  const TABLE: &'static str = "closure";
  const ID: &'static str = "closure_id";
  const COLUMNS: &'static [&'static str] = &[
    "closure_id",
    "child_term_id",
    "parent_term_id",
    "subparent_term_id",
    "distance",
    "ontology_id",
    "confident_relationship",
  ];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                     row.get(0)?,
      child_term_id:          row.get(1)?,
      parent_term_id:         row.get(2)?,
      subparent_term_id:      row.get(3)?,
      distance:               row.get(4)?,
      ontology_id:            row.get(5)?,
      confident_relationship: row.get(6)?,
    })
  }

  fn id(&self) -> i64 { self.id }
}

impl Record for Synonym {
  const TABLE: &'static str = "synonym";
  const ID: &'static str = "synonym_id";
  const COLUMNS: &'static [&'static str] = &["synonym_id", "term_id", "name", "type", "dbxref"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:      row.get(0)?,
      term_id: row.get(1)?,
      name:    row.get(2)?,
      kind:    decode_synonym_type(3, row.get(3)?)?,
      db_xref: row.get(4)?,
    })
  }

  fn id(&self) -> i64 { self.id }
}

impl Record for AltId {
  const TABLE: &'static str = "alt_id";
  const ID: &'static str = "alt_id";
  const COLUMNS: &'static [&'static str] = &["alt_id", "term_id", "accession"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, term_id: row.get(1)?, accession: row.get(2)? })
  }

  fn id(&self) -> i64 { self.id }
}

impl Record for Subset {
  const TABLE: &'static str = "subset";
  const ID: &'static str = "subset_id";
  const COLUMNS: &'static [&'static str] = &["subset_id", "name", "definition"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, name: row.get(1)?, definition: row.get(2)? })
  }

  fn id(&self) -> i64 { self.id }
}

impl Record for Meta {
  const TABLE: &'static str = "meta";
  const ID: &'static str = "meta_id";
  const COLUMNS: &'static [&'static str] = &["meta_id", "meta_key", "meta_value", "species_id"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      meta_key:   row.get(1)?,
      meta_value: row.get(2)?,
      species_id: row.get(3)?,
    })
  }

  fn id(&self) -> i64 { self.id }
}
