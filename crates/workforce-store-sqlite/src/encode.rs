//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are written as `YYYY-MM-DD`; on read the US-style `M/D/YYYY` used by
//! some ingestion runs is accepted too.

use chrono::NaiveDate;
use workforce_core::{Employee, employee};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { employee::format_date(d) }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  employee::parse_date(s).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `main_table` row.
pub struct RawEmployee {
  pub name:                      String,
  pub department:                String,
  pub position:                  String,
  pub salary:                    f64,
  pub productivity_percent:      f64,
  pub feedback_score:            f64,
  pub satisfaction_rate_percent: f64,
  pub projects_completed:        i64,
  pub joining_date:              String,
}

impl RawEmployee {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:                      row.get(0)?,
      department:                row.get(1)?,
      position:                  row.get(2)?,
      salary:                    row.get(3)?,
      productivity_percent:      row.get(4)?,
      feedback_score:            row.get(5)?,
      satisfaction_rate_percent: row.get(6)?,
      projects_completed:        row.get(7)?,
      joining_date:              row.get(8)?,
    })
  }

  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      name:                      self.name,
      department:                self.department,
      position:                  self.position,
      salary:                    self.salary,
      productivity_percent:      self.productivity_percent,
      feedback_score:            self.feedback_score,
      satisfaction_rate_percent: self.satisfaction_rate_percent,
      projects_completed:        self.projects_completed,
      joining_date:              decode_date(&self.joining_date)?,
    })
  }
}
