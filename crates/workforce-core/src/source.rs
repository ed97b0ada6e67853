//! The [`FactSource`] trait: where fact-table snapshots come from.
//!
//! Implemented by storage backends (e.g. `workforce-store-sqlite`). Reports
//! never talk to a backend directly; they receive the loaded [`FactTable`].

use std::future::Future;

use crate::table::FactTable;

/// Abstraction over anything that can produce a snapshot of `main_table`.
///
/// Sources are read-only from the point of view of this crate: loading a
/// snapshot must not modify the underlying data.
pub trait FactSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load and validate the full fact table.
  fn load_snapshot(&self) -> impl Future<Output = Result<FactTable, Self::Error>> + Send + '_;
}
