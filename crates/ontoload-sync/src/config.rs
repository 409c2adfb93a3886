//! [`LoaderConfig`] — loader options, fixed for the lifetime of a loader.
//!
//! Deserialised from the layered CLI configuration; every field has a
//! default so a partial file (or none at all) is valid.

use std::{path::PathBuf, time::Duration};

use ontoload_core::source::DEFAULT_OLS_API_URL;
use serde::{Deserialize, Serialize};

use crate::fetch::RetryPolicy;

/// Ontologies whose terms are fully synchronised, relations included.
pub const DEFAULT_ALLOWED_ONTOLOGIES: &[&str] = &[
  "GO", "SO", "PATO", "HP", "VT", "EFO", "PO", "EO", "TO", "CHEBI", "PR", "FYPO", "PECO", "BFO",
  "BTO", "CL", "CMO", "ECO", "MOD", "MP", "OGMS", "UO", "MONDO", "PHI",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
  /// Target schema release, recorded in the `schema_version` meta row.
  pub db_version:         u32,
  /// Attempts per remote call before a transient failure is fatal.
  pub max_retry:          u32,
  pub retry_delay_secs:   u64,
  /// HTTP request timeout.
  pub timeout_secs:       u64,
  pub process_relations:  bool,
  pub process_parents:    bool,
  /// Page size requested from the remote API.
  pub page_size:          u32,
  /// PHI-base identifiers created between two intermediate commits.
  pub commit_every:       usize,
  /// Where per-ontology log files are written.
  pub output_dir:         PathBuf,
  pub ols_api_url:        String,
  /// Upper-case ontology prefixes.
  pub allowed_ontologies: Vec<String>,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      db_version:         99,
      max_retry:          5,
      retry_delay_secs:   5,
      timeout_secs:       720,
      process_relations:  true,
      process_parents:    true,
      page_size:          500,
      commit_every:       100,
      output_dir:         PathBuf::from("."),
      ols_api_url:        DEFAULT_OLS_API_URL.to_owned(),
      allowed_ontologies: DEFAULT_ALLOWED_ONTOLOGIES.iter().map(|s| (*s).to_owned()).collect(),
    }
  }
}

impl LoaderConfig {
  /// Whether terms of `ontology` (a prefix or remote identifier, any case)
  /// get their relations synchronised.
  pub fn is_allowed(&self, ontology: &str) -> bool {
    self
      .allowed_ontologies
      .iter()
      .any(|allowed| allowed.eq_ignore_ascii_case(ontology))
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_retry: self.max_retry,
      delay:     Duration::from_secs(self.retry_delay_secs),
    }
  }

  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allowed_check_ignores_case() {
    let config = LoaderConfig::default();
    assert!(config.is_allowed("go"));
    assert!(config.is_allowed("PHI"));
    assert!(!config.is_allowed("NCBITaxon"));
  }

  #[test]
  fn default_url_is_the_shared_ols_endpoint() {
    assert_eq!(LoaderConfig::default().ols_api_url, ontoload_core::source::DEFAULT_OLS_API_URL);
  }

  #[test]
  fn retry_policy_follows_the_options() {
    let config = LoaderConfig { max_retry: 2, retry_delay_secs: 0, ..Default::default() };
    let policy = config.retry_policy();
    assert_eq!(policy.max_retry, 2);
    assert_eq!(policy.delay, Duration::ZERO);
  }
}
