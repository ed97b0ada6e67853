//! Error type for `workforce-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] workforce_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// `main_table` does not exist in the opened database.
  #[error("table not found: {0}")]
  TableNotFound(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
