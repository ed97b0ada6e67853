//! Layered configuration: defaults, then the TOML file, then `WORKFORCE_*`
//! environment variables. Command-line flags are applied on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use serde::Deserialize;
use workforce_core::ReportContext;

/// Runtime configuration, deserialised from `workforce.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database holding `main_table`.
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  /// Reference date for tenure calculations; today when unset.
  #[serde(default)]
  pub as_of:         Option<NaiveDate>,
  #[serde(default = "default_top_n")]
  pub top_n:         usize,
  #[serde(default = "default_min_sample")]
  pub min_sample:    usize,
}

fn default_database_path() -> PathBuf { PathBuf::from("workforce.db") }

fn default_top_n() -> usize { ReportContext::DEFAULT_TOP_N }

fn default_min_sample() -> usize { ReportContext::DEFAULT_MIN_SAMPLE }

impl Settings {
  /// Load settings from `path` (optional) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("WORKFORCE"))
      .build()
      .context("failed to read config file")?;

    let mut loaded: Self = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;
    loaded.database_path = expand_tilde(&loaded.database_path);
    Ok(loaded)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
