//! Tracing setup: stderr plus an ANSI-free per-ontology log file.

use std::{
  fs::{self, OpenOptions},
  path::Path,
  sync::Mutex,
};

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// `--verbosity` to the default level; `RUST_LOG` overrides it.
fn level(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 | 1 => LevelFilter::ERROR,
    2 => LevelFilter::WARN,
    3 => LevelFilter::INFO,
    4 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  }
}

fn filter(verbosity: u8) -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(level(verbosity).into())
    .from_env_lossy()
}

/// Install the global subscriber. When `ontology` is given, events are
/// also appended to `<output_dir>/<ontology>.ontology.log`.
pub fn init(verbosity: u8, output_dir: &Path, ontology: Option<&str>) -> anyhow::Result<()> {
  let stderr = fmt::layer().with_writer(std::io::stderr).with_filter(filter(verbosity));

  let file = match ontology {
    Some(name) => {
      fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {output_dir:?}"))?;
      let path = output_dir.join(format!("{}.ontology.log", name.to_lowercase()));
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {path:?}"))?;
      Some(
        fmt::layer()
          .with_ansi(false)
          .with_writer(Mutex::new(file))
          .with_filter(filter(verbosity)),
      )
    }
    None => None,
  };

  tracing_subscriber::registry()
    .with(stderr)
    .with(file)
    .try_init()
    .context("failed to install tracing subscriber")
}
