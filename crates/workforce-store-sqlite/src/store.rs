//! [`SqliteStore`]: the SQLite implementation of [`FactSource`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::OpenFlags;
use strum::IntoEnumIterator as _;
use workforce_core::{
  Column, Employee, Error as CoreError, FactTable, ReportContext,
  report::{history, salary, tenure},
  source::FactSource,
};

use crate::{
  Error, Result,
  encode::{RawEmployee, encode_date},
  schema::{DERIVED_SCHEMA, MAIN_INDEXES, MAIN_SCHEMA, MAIN_TABLE},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fact-table store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Row counts written by [`SqliteStore::materialize_views`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeSummary {
  pub employee_tenure:     usize,
  pub performance_history: usize,
  pub salary_bands:        usize,
}

impl SqliteStore {
  /// Open (or create) a writable store at `path`, creating `main_table` if it
  /// does not exist yet.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an existing database read-only. Fails if `main_table` is missing or
  /// lacks a required column.
  pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = tokio_rusqlite::Connection::open_with_flags(path, flags).await?;
    let store = Self { conn };
    store.validate_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Create `main_table` if needed, validate it, then add the indexes.
  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(MAIN_SCHEMA)?;
        Ok(())
      })
      .await?;
    self.validate_schema().await?;
    self
      .conn
      .call(|conn| {
        conn.execute_batch(MAIN_INDEXES)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Check that `main_table` carries every fact-table column.
  ///
  /// Fails with [`CoreError::MissingColumn`] naming the first absent column.
  pub async fn validate_schema(&self) -> Result<()> {
    let present: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let names = stmt
          .query_map(rusqlite::params![MAIN_TABLE], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await?;

    if present.is_empty() {
      return Err(Error::TableNotFound(MAIN_TABLE));
    }
    if let Some(missing) = Column::iter().find(|c| {
      !present
        .iter()
        .any(|p| p.eq_ignore_ascii_case(c.as_str()))
    }) {
      return Err(CoreError::MissingColumn(missing).into());
    }
    Ok(())
  }

  /// Append rows to `main_table` in a single transaction.
  ///
  /// This is the ingestion seam used by loaders and tests; reports never
  /// write to the fact table. Rows are validated before anything is written.
  pub async fn import(&self, rows: Vec<Employee>) -> Result<usize> {
    for (i, row) in rows.iter().enumerate() {
      row.validate(i)?;
    }

    let count = rows.len();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO main_table (
               name, department, position, salary, productivity_percent,
               feedback_score, satisfaction_rate_percent, projects_completed,
               joining_date
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for e in &rows {
            stmt.execute(rusqlite::params![
              e.name,
              e.department,
              e.position,
              e.salary,
              e.productivity_percent,
              e.feedback_score,
              e.satisfaction_rate_percent,
              e.projects_completed,
              encode_date(e.joining_date),
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(rows = count, "imported rows into {MAIN_TABLE}");
    Ok(count)
  }

  /// Rebuild the derived tables (`employee_tenure`, `performance_history`,
  /// `salary_bands`) from the current fact table, as of `as_of`.
  ///
  /// Requires a writable store. The rebuild is atomic: readers see either the
  /// previous or the new contents.
  pub async fn materialize_views(&self, as_of: NaiveDate) -> Result<MaterializeSummary> {
    let table = self.load_snapshot().await?;
    let ctx = ReportContext::new(as_of);

    let tenure_rows = tenure::employee_tenure(&table, &ctx);
    let history_rows = history::performance_history(&table);
    let band_rows = salary::salary_bands();

    let summary = MaterializeSummary {
      employee_tenure:     tenure_rows.len(),
      performance_history: history_rows.len(),
      salary_bands:        band_rows.len(),
    };
    let as_of_str = encode_date(as_of);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(DERIVED_SCHEMA)?;
        tx.execute_batch(
          "DELETE FROM employee_tenure;
           DELETE FROM performance_history;
           DELETE FROM salary_bands;",
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO employee_tenure (
               name, department, days_in_company, projects_per_year,
               tenure_quartile, as_of
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for r in &tenure_rows {
            stmt.execute(rusqlite::params![
              r.name,
              r.department,
              r.days_in_company,
              r.projects_per_year,
              r.tenure_quartile as i64,
              as_of_str,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO performance_history (
               name, department, year, quarter, rolling_avg_productivity,
               total_projects
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for r in &history_rows {
            stmt.execute(rusqlite::params![
              r.name,
              r.department,
              r.year,
              r.quarter,
              r.rolling_avg_productivity,
              r.total_projects,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO salary_bands (band_name, min_salary, max_salary, benchmark_ratio)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for b in &band_rows {
            stmt.execute(rusqlite::params![
              b.band,
              b.min_salary,
              b.max_salary,
              b.benchmark_ratio,
            ])?;
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(
      %as_of,
      employee_tenure = summary.employee_tenure,
      performance_history = summary.performance_history,
      "materialized derived views"
    );
    Ok(summary)
  }
}

// ─── FactSource impl ─────────────────────────────────────────────────────────

impl FactSource for SqliteStore {
  type Error = Error;

  async fn load_snapshot(&self) -> Result<FactTable> {
    let raws: Vec<RawEmployee> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             name, department, position, salary, productivity_percent,
             feedback_score, satisfaction_rate_percent, projects_completed,
             joining_date
           FROM main_table
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], RawEmployee::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let rows = raws
      .into_iter()
      .map(RawEmployee::into_employee)
      .collect::<Result<Vec<_>>>()?;
    let table = FactTable::new(rows)?;

    tracing::info!(rows = table.len(), "loaded {MAIN_TABLE} snapshot");
    Ok(table)
  }
}
