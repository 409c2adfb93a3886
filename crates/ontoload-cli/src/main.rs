//! `ontoload` — synchronise OLS ontologies into a SQLite database.
//!
//! Every subcommand is one unit of work, so an external scheduler can run
//! them in parallel against the same database file (one `terms` job per
//! slice, say). `load` chains them for a one-shot interactive import.
//!
//! # Usage
//!
//! ```text
//! ontoload --db ontology_99.sqlite init --release 99
//! ontoload --db ontology_99.sqlite ontology go --wipe
//! ontoload --db ontology_99.sqlite terms go --slice 0-500
//! ontoload --db ontology_99.sqlite report go
//! ontoload load go --release 99
//! ```

mod commands;
mod logging;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use commands::Slice;
use ontoload_ols::{OlsClient, OlsConfig};
use ontoload_store_sqlite::SqliteStore;
use ontoload_sync::{OntologyLoader, PHI_ONTOLOGY};
use settings::Overrides;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ontoload", version, about = "Load OLS ontologies into a SQLite database")]
struct Cli {
  /// Path to a TOML config file. Defaults to `ontoload.toml` when present.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Database file, as a path or `sqlite://path`.
  #[arg(long, env = "ONTOLOAD_DB", value_name = "PATH")]
  db: Option<String>,

  /// 1 (errors only) to 5 (trace). `RUST_LOG` takes precedence.
  #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
  verbosity: u8,

  /// Directory for the per-ontology log files.
  #[arg(long, value_name = "DIR")]
  output_dir: Option<PathBuf>,

  /// Base URL of the OLS REST API.
  #[arg(long, value_name = "URL")]
  ols_api_url: Option<String>,

  /// Ontologies whose relations are synchronised, comma separated.
  #[arg(long, value_delimiter = ',', value_name = "A,B")]
  allowed: Option<Vec<String>>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create the schema and record the release in the meta table.
  Init {
    #[arg(long)]
    release: u32,
  },
  /// Load one ontology's detail and print its term count as JSON.
  Ontology {
    name: String,
    /// Remove everything previously loaded for this ontology first.
    #[arg(long)]
    wipe: bool,
  },
  /// Load an ontology's terms, or the `START-STOP` slice of them.
  Terms {
    name:  String,
    #[arg(long, value_name = "START-STOP")]
    slice: Option<Slice>,
  },
  /// Remove an ontology and everything attached to it.
  Wipe { name: String },
  /// Print per-namespace row counts for an ontology as JSON.
  Report { name: String },
  /// Create the PHI-base identifiers `PHI:<start>` through `PHI:<end>`.
  Phi {
    #[arg(long, default_value_t = 0)]
    start: u32,
    #[arg(long, default_value_t = 9999)]
    end:   u32,
  },
  /// Interactive full import: init, wipe unless `--keep`, load, report.
  /// `all` loads every allowed ontology and, without `--keep`, recreates
  /// the schema first.
  Load {
    #[arg(default_value = commands::ALL)]
    name:    String,
    #[arg(long)]
    release: u32,
    /// Keep previously loaded rows instead of wiping them.
    #[arg(long)]
    keep:    bool,
    #[arg(long, value_name = "START-STOP")]
    slice:   Option<Slice>,
    /// Do not ask for confirmation.
    #[arg(short, long)]
    yes:     bool,
  },
}

impl Command {
  /// Ontology whose log file this command writes to.
  fn log_name(&self) -> Option<&str> {
    match self {
      Self::Init { .. } => None,
      Self::Ontology { name, .. }
      | Self::Terms { name, .. }
      | Self::Wipe { name }
      | Self::Report { name }
      | Self::Load { name, .. } => Some(name.as_str()),
      Self::Phi { .. } => Some(PHI_ONTOLOGY),
    }
  }

  fn release(&self) -> Option<u32> {
    match self {
      Self::Init { release } | Self::Load { release, .. } => Some(*release),
      _ => None,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // File and environment first, then CLI flags on top.
  let mut config = settings::load(cli.config.as_deref())?;
  Overrides {
    output_dir:  cli.output_dir,
    ols_api_url: cli.ols_api_url,
    allowed:     cli.allowed,
    release:     cli.command.release(),
  }
  .apply(&mut config);

  logging::init(cli.verbosity, &config.output_dir, cli.command.log_name())?;

  let db_path = settings::database_path(cli.db.as_deref(), &config);
  if let Command::Load { name, yes: false, .. } = &cli.command {
    let prompt = format!("Load {name} into {}. Confirm to proceed", db_path.display());
    if !commands::confirm(&prompt)? {
      anyhow::bail!("cancelled");
    }
  }

  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open database at {db_path:?}"))?;

  let client = OlsClient::new(&OlsConfig {
    base_url:  config.ols_api_url.clone(),
    page_size: config.page_size,
    timeout:   config.timeout(),
  })
  .context("failed to build OLS client")?;

  tracing::debug!(?config, db = %db_path.display(), "starting");
  let loader = OntologyLoader::new(store, client, config);
  commands::run(&loader, cli.command).await
}
