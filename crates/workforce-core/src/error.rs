//! Error types for `workforce-core`.

use thiserror::Error;

use crate::employee::Column;

#[derive(Debug, Error)]
pub enum Error {
  /// An input row (or the backing table) lacks one of the fact-table columns.
  #[error("missing column: {0}")]
  MissingColumn(Column),

  #[error("row {row}: invalid {column}: {reason}")]
  InvalidValue {
    row:    usize,
    column: Column,
    reason: String,
  },

  #[error("invalid date {0:?}: expected YYYY-MM-DD or M/D/YYYY")]
  InvalidDate(String),

  #[error("unknown report: {0:?}")]
  UnknownReport(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
