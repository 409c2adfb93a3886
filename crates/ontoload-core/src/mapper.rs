//! Entity mapper: remote DTO → local column values.
//!
//! Each (entity, DTO) pair has an explicit alias table of
//! `(local column, remote attribute, reader)` entries. [`map_fields`] walks a
//! table and keeps every value the DTO actually carries; attributes absent on
//! the DTO are left out so that a refresh leaves the stored column untouched.

use crate::{
  field::{FieldValue, Fields},
  remote::{RemoteOntology, RemoteProperty, RemoteTerm},
};

/// One entry of an alias table.
pub struct FieldSpec<S> {
  /// Column of the local table.
  pub local:  &'static str,
  /// Attribute name on the remote DTO.
  pub remote: &'static str,
  pub read:   fn(&S) -> Option<FieldValue>,
}

/// Apply an alias table to `source`.
pub fn map_fields<S>(specs: &[FieldSpec<S>], source: &S) -> Fields {
  specs
    .iter()
    .filter_map(|spec| (spec.read)(source).map(|v| (spec.local, v)))
    .filter(|(_, v)| !v.is_null())
    .collect()
}

fn text(v: Option<&str>) -> Option<FieldValue> {
  v.filter(|s| !s.is_empty()).map(FieldValue::from)
}

// ─── Ontology ────────────────────────────────────────────────────────────────

pub const ONTOLOGY_FIELDS: &[FieldSpec<RemoteOntology>] = &[
  FieldSpec { local: "name", remote: "ontology_id", read: |o| Some(o.name().into()) },
  FieldSpec {
    local:  "namespace",
    remote: "namespace",
    read:   |o| Some(o.default_namespace().into()),
  },
  FieldSpec { local: "data_version", remote: "version", read: |o| text(o.version.as_deref()) },
  FieldSpec { local: "title", remote: "title", read: |o| text(o.title.as_deref()) },
];

// ─── Term ────────────────────────────────────────────────────────────────────

pub const TERM_FIELDS: &[FieldSpec<RemoteTerm>] = &[
  FieldSpec { local: "accession", remote: "obo_id", read: |t| t.accession().map(Into::into) },
  FieldSpec { local: "name", remote: "label", read: |t| text(Some(t.label.as_str())) },
  FieldSpec {
    local:  "definition",
    remote: "description",
    read:   |t| t.description_text().map(Into::into),
  },
  FieldSpec { local: "subsets", remote: "in_subset", read: |t| t.subsets().map(Into::into) },
  FieldSpec { local: "is_root", remote: "is_root", read: |t| Some(t.is_root.into()) },
  FieldSpec { local: "is_obsolete", remote: "is_obsolete", read: |t| Some(t.is_obsolete.into()) },
  FieldSpec { local: "iri", remote: "iri", read: |t| text(Some(t.iri.as_str())) },
];

// ─── Subset ──────────────────────────────────────────────────────────────────

pub const SUBSET_FIELDS: &[FieldSpec<RemoteProperty>] = &[FieldSpec {
  local:  "definition",
  remote: "description",
  read:   |p| text(p.definition.as_deref()),
}];
