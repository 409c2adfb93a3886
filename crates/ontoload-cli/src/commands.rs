//! Subcommand bodies.

use std::{
  io::{self, BufRead as _, Write as _},
  str::FromStr,
};

use anyhow::{Context as _, bail};
use ontoload_core::source::OntologySource;
use ontoload_sync::{OntologyLoader, PHI_ONTOLOGY};
use serde_json::json;
use tracing::info;

use crate::Command;

/// `load` target meaning every allowed ontology.
pub const ALL: &str = "all";

/// A `START-STOP` range of term indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
  pub start: usize,
  pub stop:  usize,
}

impl FromStr for Slice {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (start, stop) = s
      .split_once('-')
      .ok_or_else(|| format!("expected START-STOP, got {s:?}"))?;
    let parse = |v: &str| {
      v.trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid slice bound {v:?}: {e}"))
    };
    Ok(Self { start: parse(start)?, stop: parse(stop)? })
  }
}

fn bounds(slice: Option<Slice>) -> (Option<usize>, Option<usize>) {
  match slice {
    Some(s) => (Some(s.start), Some(s.stop)),
    None => (None, None),
  }
}

/// Ask a yes/no question on stdin. Anything but `y` is a no.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
  print!("{prompt} (y/N)? ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim().eq_ignore_ascii_case("y"))
}

fn require_allowed<S: OntologySource>(loader: &OntologyLoader<S>, name: &str) -> anyhow::Result<()> {
  if !loader.config().is_allowed(name) {
    bail!("ontology {name} is not in the allowed list");
  }
  Ok(())
}

pub async fn run<S: OntologySource>(loader: &OntologyLoader<S>, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Init { release } => {
      loader.init_schema().await.context("failed to initialise schema")?;
      info!(release, "database ready");
    }

    Command::Ontology { name, wipe } => {
      if wipe {
        loader.wipe_ontology(&name).await?;
      }
      require_allowed(loader, &name)?;
      let loaded = loader
        .load_ontology(&name, None)
        .await
        .with_context(|| format!("failed to load ontology {name}"))?;
      println!(
        "{}",
        json!({ "ontology_name": name, "nb_terms": loaded.remote.number_of_terms })
      );
    }

    Command::Terms { name, slice } => {
      let (start, stop) = bounds(slice);
      let counts = loader
        .load_ontology_terms(&name, start, stop)
        .await
        .with_context(|| format!("failed to load {name} terms"))?;
      // A rejected slice is not a failure; the scheduler just moves on.
      if let Some(counts) = counts {
        println!("{}", serde_json::to_string(&counts)?);
      }
    }

    Command::Wipe { name } => {
      let wiped = loader.wipe_ontology(&name).await?;
      println!("{}", json!({ "ontology_name": name, "wiped": wiped }));
    }

    Command::Report { name } => {
      require_allowed(loader, &name)?;
      let reports = loader.final_report(&name).await?;
      println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Command::Phi { start, end } => {
      if end < start {
        bail!("invalid identifier range {start}..={end}");
      }
      let created = loader.load_phibase_identifiers(start, end).await?;
      println!("{}", json!({ "created": created }));
    }

    Command::Load { name, release, keep, slice, .. } => {
      let everything = name.eq_ignore_ascii_case(ALL);
      let names: Vec<String> = if everything {
        if !keep {
          loader.store().drop_schema().await.context("failed to drop schema")?;
        }
        // PHI-base identifiers have their own command.
        loader
          .config()
          .allowed_ontologies
          .iter()
          .filter(|n| !n.eq_ignore_ascii_case(PHI_ONTOLOGY))
          .cloned()
          .collect()
      } else {
        vec![name]
      };
      loader.init_schema().await.context("failed to initialise schema")?;

      let (start, stop) = bounds(slice);
      for name in &names {
        // A dropped schema has nothing left to wipe.
        if !keep && !everything {
          loader.wipe_ontology(name).await?;
        }
        loader
          .load_ontology(name, None)
          .await
          .with_context(|| format!("failed to load ontology {name}"))?;
        loader
          .load_ontology_terms(name, start, stop)
          .await
          .with_context(|| format!("failed to load {name} terms"))?;
        let reports = loader.final_report(name).await?;
        println!("{}", serde_json::to_string_pretty(&reports)?);
      }
      info!(ontologies = names.len(), release, "load complete");
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slices_parse() {
    assert_eq!("0-500".parse::<Slice>(), Ok(Slice { start: 0, stop: 500 }));
    assert_eq!(" 10 - 20".parse::<Slice>(), Ok(Slice { start: 10, stop: 20 }));
    assert!("500".parse::<Slice>().is_err());
    assert!("a-b".parse::<Slice>().is_err());
    assert!("-5-10".parse::<Slice>().is_err());
  }
}
