//! JSON shapes of the OLS API and their conversion into core DTOs.
//!
//! Every field the loader does not strictly need is optional; the API
//! sends `null` freely.

use std::collections::BTreeMap;

use ontoload_core::remote::{OboSynonym, OboXref, RemoteOntology, RemoteProperty, RemoteTerm};
use serde::Deserialize;
use serde_json::Value;

// ─── HAL envelopes ───────────────────────────────────────────────────────────

/// One page of a HAL collection.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
  #[serde(rename = "_embedded")]
  pub embedded: Option<T>,
  pub page:     Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
  pub number:      u32,
  pub total_pages: u32,
}

impl<T> Page<T> {
  /// Whether a page follows this one.
  pub fn has_next(&self) -> bool {
    self.page.as_ref().is_some_and(|p| p.number + 1 < p.total_pages)
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbeddedTerms {
  #[serde(default)]
  pub terms: Vec<WireTerm>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbeddedProperties {
  #[serde(default)]
  pub properties: Vec<WireProperty>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
  pub href: String,
}

// ─── Ontology ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOntology {
  pub ontology_id:           String,
  pub updated:               Option<String>,
  pub version:               Option<String>,
  pub number_of_terms:       Option<u64>,
  pub number_of_properties:  Option<u64>,
  pub number_of_individuals: Option<u64>,
  #[serde(default)]
  pub config:                WireOntologyConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireOntologyConfig {
  pub title:     Option<String>,
  pub namespace: Option<String>,
  pub version:   Option<String>,
}

impl From<WireOntology> for RemoteOntology {
  fn from(w: WireOntology) -> Self {
    Self {
      ontology_id:           w.ontology_id,
      namespace:             w.config.namespace,
      version:               w.config.version.or(w.version),
      title:                 w.config.title,
      updated:               w.updated,
      number_of_terms:       w.number_of_terms.unwrap_or_default(),
      number_of_properties:  w.number_of_properties.unwrap_or_default(),
      number_of_individuals: w.number_of_individuals.unwrap_or_default(),
    }
  }
}

// ─── Term ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WireTerm {
  pub iri:                  String,
  pub label:                Option<String>,
  pub description:          Option<Vec<String>>,
  #[serde(default)]
  pub annotation:           BTreeMap<String, Value>,
  pub synonyms:             Option<Vec<String>>,
  #[serde(default)]
  pub ontology_name:        String,
  pub is_obsolete:          Option<bool>,
  pub is_root:              Option<bool>,
  pub is_defining_ontology: Option<bool>,
  pub short_form:           Option<String>,
  pub obo_id:               Option<String>,
  pub in_subset:            Option<Vec<String>>,
  pub obo_synonym:          Option<Vec<WireOboSynonym>>,
  #[serde(rename = "_links", default)]
  pub links:                BTreeMap<String, Link>,
}

#[derive(Debug, Deserialize)]
pub struct WireOboSynonym {
  pub name:  String,
  #[serde(default)]
  pub scope: String,
  pub xrefs: Option<Vec<WireXref>>,
}

#[derive(Debug, Deserialize)]
pub struct WireXref {
  pub database: Option<String>,
  pub id:       Option<String>,
}

/// String values of an annotation, which the API sends as a list (or,
/// occasionally, a bare string).
fn annotation_strings(annotation: &BTreeMap<String, Value>, key: &str) -> Vec<String> {
  match annotation.get(key) {
    Some(Value::Array(items)) => items
      .iter()
      .filter_map(|v| v.as_str().map(str::to_owned))
      .collect(),
    Some(Value::String(s)) => vec![s.clone()],
    _ => Vec::new(),
  }
}

impl From<WireTerm> for RemoteTerm {
  fn from(w: WireTerm) -> Self {
    let obo_namespace = annotation_strings(&w.annotation, "has_obo_namespace").into_iter().next();
    let alternative_ids = annotation_strings(&w.annotation, "has_alternative_id");
    let related_synonyms = annotation_strings(&w.annotation, "has_related_synonym");
    let obo_synonyms = w
      .obo_synonym
      .unwrap_or_default()
      .into_iter()
      .map(|s| OboSynonym {
        name:  s.name,
        scope: s.scope,
        xrefs: s
          .xrefs
          .unwrap_or_default()
          .into_iter()
          .map(|x| OboXref { database: x.database, id: x.id })
          .collect(),
      })
      .collect();

    Self {
      iri: w.iri,
      label: w.label.unwrap_or_default(),
      description: w.description.unwrap_or_default(),
      obo_id: w.obo_id,
      short_form: w.short_form,
      ontology_name: w.ontology_name,
      obo_namespace,
      is_obsolete: w.is_obsolete.unwrap_or_default(),
      is_root: w.is_root.unwrap_or_default(),
      is_defining_ontology: w.is_defining_ontology.unwrap_or_default(),
      in_subset: w.in_subset.unwrap_or_default(),
      synonyms: w.synonyms.unwrap_or_default(),
      obo_synonyms,
      related_synonyms,
      alternative_ids,
      links: w.links.into_iter().map(|(k, l)| (k, l.href)).collect(),
    }
  }
}

// ─── Property ────────────────────────────────────────────────────────────────

/// A property, either from `/properties` or from a search hit.
#[derive(Debug, Deserialize)]
pub struct WireProperty {
  pub iri:         String,
  pub label:       Option<String>,
  pub short_form:  Option<String>,
  pub description: Option<Vec<String>>,
  #[serde(default)]
  pub annotation:  BTreeMap<String, Value>,
}

impl From<WireProperty> for RemoteProperty {
  fn from(w: WireProperty) -> Self {
    let definition = w
      .description
      .filter(|d| !d.is_empty())
      .map(|d| d.join(" "))
      .or_else(|| annotation_strings(&w.annotation, "definition").into_iter().next());
    Self {
      iri: w.iri,
      label: w.label.unwrap_or_default(),
      short_form: w.short_form.unwrap_or_default(),
      definition,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
  pub response: SearchBody,
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
  #[serde(default)]
  pub docs: Vec<WireProperty>,
}
