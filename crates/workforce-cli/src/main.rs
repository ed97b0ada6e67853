//! `workforce`: run the reporting catalog over an employee fact table.
//!
//! Reads `workforce.toml` (or the path given with `--config`), loads a
//! snapshot of `main_table` from SQLite (or a JSON export), runs the requested
//! reports and prints their rows as JSON on stdout. Logs go to stderr.
//!
//! ```text
//! workforce list
//! workforce run --database hr.db --as-of 2025-06-01 -r turnover_by_tenure
//! workforce run --input snapshot.json --department Sales --pretty
//! workforce materialize --database hr.db
//! ```

mod runner;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use strum::IntoEnumIterator as _;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use workforce_core::{EmployeeFilter, FactTable, ReportContext, ReportKind, source::FactSource};
use workforce_store_sqlite::SqliteStore;

use runner::run_reports;
use settings::{Settings, expand_tilde};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Workforce analytics reports over main_table")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "workforce.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Print the names of all available reports.
  List,
  /// Run reports and print their rows as JSON.
  Run(RunArgs),
  /// Rebuild the derived tables stored next to main_table.
  Materialize(SourceArgs),
}

#[derive(Args)]
struct SourceArgs {
  /// SQLite database holding main_table (overrides the config file).
  #[arg(long)]
  database: Option<PathBuf>,

  /// Reference date (YYYY-MM-DD) used as "today" for tenure calculations.
  #[arg(long)]
  as_of: Option<NaiveDate>,
}

#[derive(Args)]
struct RunArgs {
  #[command(flatten)]
  source: SourceArgs,

  /// Read the fact table from a JSON array instead of SQLite.
  #[arg(long, value_name = "FILE", conflicts_with = "database")]
  input: Option<PathBuf>,

  /// Report to run; repeat for several. Runs the whole catalog when omitted.
  #[arg(short, long = "report", value_name = "NAME")]
  reports: Vec<String>,

  /// Only include employees of this department.
  #[arg(long)]
  department: Option<String>,

  /// Only include employees with at least this feedback score.
  #[arg(long)]
  min_feedback: Option<f64>,

  /// Only include employees with at least this satisfaction rate.
  #[arg(long)]
  min_satisfaction: Option<f64>,

  /// Rows returned by ranking reports.
  #[arg(long)]
  top: Option<usize>,

  /// Pretty-print the JSON output.
  #[arg(long)]
  pretty: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing; stdout is reserved for report output.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  match cli.command {
    Command::List => {
      for kind in ReportKind::iter() {
        println!("{kind}");
      }
      Ok(())
    }
    Command::Run(args) => run(args, &settings).await,
    Command::Materialize(args) => materialize(args, &settings).await,
  }
}

async fn run(args: RunArgs, settings: &Settings) -> anyhow::Result<()> {
  let kinds = if args.reports.is_empty() {
    ReportKind::iter().collect()
  } else {
    args
      .reports
      .iter()
      .map(|name| ReportKind::parse(name))
      .collect::<Result<Vec<_>, _>>()?
  };

  let mut ctx = ReportContext::new(as_of(args.source.as_of, settings));
  ctx.top_n = args.top.unwrap_or(settings.top_n);
  ctx.min_sample = settings.min_sample;

  let table = match &args.input {
    Some(path) => {
      let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading input file {}", path.display()))?;
      FactTable::from_json(&raw).with_context(|| format!("parsing {}", path.display()))?
    }
    None => {
      let path = database_path(args.source.database.as_ref(), settings);
      let store = SqliteStore::open_existing(&path)
        .await
        .with_context(|| format!("failed to open database at {path:?}"))?;
      load(&store).await?
    }
  };

  let filter = EmployeeFilter {
    department:       args.department,
    min_feedback:     args.min_feedback,
    min_satisfaction: args.min_satisfaction,
  };
  let table = if filter.is_empty() { table } else { table.filtered(&filter) };
  tracing::info!(rows = table.len(), reports = kinds.len(), as_of = %ctx.as_of, "running reports");

  let outputs = run_reports(Arc::new(table), Arc::new(ctx), &kinds).await;

  let json = if args.pretty {
    serde_json::to_string_pretty(&outputs)
  } else {
    serde_json::to_string(&outputs)
  }
  .context("serialising report output")?;
  println!("{json}");

  let failed = outputs.iter().filter(|o| o.is_failed()).count();
  if failed > 0 {
    anyhow::bail!("{failed} report(s) failed");
  }
  Ok(())
}

async fn materialize(args: SourceArgs, settings: &Settings) -> anyhow::Result<()> {
  let path = database_path(args.database.as_ref(), settings);
  let store = SqliteStore::open(&path)
    .await
    .with_context(|| format!("failed to open database at {path:?}"))?;

  let summary = store
    .materialize_views(as_of(args.as_of, settings))
    .await
    .context("failed to materialize derived views")?;

  println!(
    "employee_tenure={} performance_history={} salary_bands={}",
    summary.employee_tenure, summary.performance_history, summary.salary_bands
  );
  Ok(())
}

/// Load a snapshot from any fact source.
async fn load<S: FactSource>(source: &S) -> anyhow::Result<FactTable> {
  source
    .load_snapshot()
    .await
    .context("failed to load main_table snapshot")
}

/// The flag wins over the config file; only here is the system clock read.
fn as_of(flag: Option<NaiveDate>, settings: &Settings) -> NaiveDate {
  flag
    .or(settings.as_of)
    .unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn database_path(flag: Option<&PathBuf>, settings: &Settings) -> PathBuf {
  flag
    .map(|p| expand_tilde(p))
    .unwrap_or_else(|| settings.database_path.clone())
}
