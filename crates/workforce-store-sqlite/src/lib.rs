//! SQLite backend for the workforce fact table.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The store reads `main_table` into
//! immutable [`workforce_core::FactTable`] snapshots and can optionally
//! persist derived views next to it.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{MaterializeSummary, SqliteStore};
