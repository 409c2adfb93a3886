//! Layered configuration: TOML file, then `ONTOLOAD_*` environment
//! variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ontoload_sync::LoaderConfig;

/// Read [`LoaderConfig`] from `path` (required when given, otherwise an
/// optional `ontoload.toml`) and the environment.
pub fn load(path: Option<&Path>) -> anyhow::Result<LoaderConfig> {
  let file = match path {
    Some(path) => config::File::from(path).required(true),
    None => config::File::with_name("ontoload").required(false),
  };
  let settings = config::Config::builder()
    .add_source(file)
    .add_source(
      config::Environment::with_prefix("ONTOLOAD")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("allowed_ontologies"),
    )
    .build()
    .context("failed to read configuration")?;

  settings
    .try_deserialize()
    .context("failed to deserialise LoaderConfig")
}

/// Command-line values that win over the file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
  pub output_dir:  Option<PathBuf>,
  pub ols_api_url: Option<String>,
  pub allowed:     Option<Vec<String>>,
  pub release:     Option<u32>,
}

impl Overrides {
  pub fn apply(self, config: &mut LoaderConfig) {
    if let Some(dir) = self.output_dir {
      config.output_dir = dir;
    }
    if let Some(url) = self.ols_api_url {
      config.ols_api_url = url;
    }
    if let Some(allowed) = self.allowed {
      config.allowed_ontologies = allowed
        .iter()
        .map(|name| name.trim().to_uppercase())
        .filter(|name| !name.is_empty())
        .collect();
    }
    if let Some(release) = self.release {
      config.db_version = release;
    }
  }
}

/// Database file from `--db` (a path or `sqlite://path`), defaulting to
/// `ontology_<release>.sqlite` in the output directory.
pub fn database_path(db: Option<&str>, config: &LoaderConfig) -> PathBuf {
  match db {
    Some(url) => PathBuf::from(url.strip_prefix("sqlite://").unwrap_or(url)),
    None => config.output_dir.join(format!("ontology_{}.sqlite", config.db_version)),
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn file_values_are_layered_over_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "max_retry = 2\ncommit_every = 10\nallowed_ontologies = [\"GO\", \"SO\"]").unwrap();

    let config = load(Some(file.path())).unwrap();
    assert_eq!(config.max_retry, 2);
    assert_eq!(config.commit_every, 10);
    assert_eq!(config.allowed_ontologies, ["GO", "SO"]);
    assert_eq!(config.page_size, LoaderConfig::default().page_size);
  }

  #[test]
  fn explicit_config_file_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load(Some(&dir.path().join("missing.toml"))).is_err());
  }

  #[test]
  fn flags_override_configuration() {
    let mut config = LoaderConfig::default();
    Overrides {
      output_dir:  Some("/tmp/logs".into()),
      ols_api_url: Some("http://localhost:8080/api".into()),
      allowed:     Some(vec!["go".into(), " efo ".into(), String::new()]),
      release:     Some(112),
    }
    .apply(&mut config);

    assert_eq!(config.output_dir, PathBuf::from("/tmp/logs"));
    assert_eq!(config.ols_api_url, "http://localhost:8080/api");
    assert_eq!(config.allowed_ontologies, ["GO", "EFO"]);
    assert_eq!(config.db_version, 112);

    // Absent flags leave the configuration alone.
    let before = config.clone();
    Overrides::default().apply(&mut config);
    assert_eq!(config, before);
  }

  #[test]
  fn database_path_accepts_urls() {
    let config = LoaderConfig { output_dir: "/data".into(), db_version: 99, ..Default::default() };
    assert_eq!(database_path(Some("sqlite:///var/db/onto.sqlite"), &config), PathBuf::from("/var/db/onto.sqlite"));
    assert_eq!(database_path(Some("local.sqlite"), &config), PathBuf::from("local.sqlite"));
    assert_eq!(database_path(None, &config), PathBuf::from("/data/ontology_99.sqlite"));
  }
}
