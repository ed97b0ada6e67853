//! The employee record: one row of the canonical `main_table`.
//!
//! Rows are immutable once loaded. Everything a report needs about tenure is
//! derived here from `joining_date` and an explicit reference date; nothing
//! in this crate reads the system clock.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::{Error, Result};

// ─── Columns ─────────────────────────────────────────────────────────────────

/// The columns every fact table must carry, in declaration order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  EnumIter,
  IntoStaticStr,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Column {
  Name,
  Department,
  Position,
  Salary,
  ProductivityPercent,
  FeedbackScore,
  SatisfactionRatePercent,
  ProjectsCompleted,
  JoiningDate,
}

impl Column {
  /// The SQL / JSON column name.
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Employee ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
  pub name:                      String,
  pub department:                String,
  pub position:                  String,
  pub salary:                    f64,
  pub productivity_percent:      f64,
  pub feedback_score:            f64,
  pub satisfaction_rate_percent: f64,
  pub projects_completed:        i64,
  #[serde(with = "joining_date")]
  pub joining_date:              NaiveDate,
}

impl Employee {
  /// Check value ranges. `row` is only used to label the error.
  pub fn validate(&self, row: usize) -> Result<()> {
    let invalid = |column, reason: String| Error::InvalidValue { row, column, reason };

    check_range(self.salary, 0.0, f64::INFINITY)
      .map_err(|r| invalid(Column::Salary, r))?;
    check_range(self.productivity_percent, 0.0, 100.0)
      .map_err(|r| invalid(Column::ProductivityPercent, r))?;
    check_range(self.feedback_score, 0.0, 5.0)
      .map_err(|r| invalid(Column::FeedbackScore, r))?;
    check_range(self.satisfaction_rate_percent, 0.0, 100.0)
      .map_err(|r| invalid(Column::SatisfactionRatePercent, r))?;
    if self.projects_completed < 0 {
      return Err(invalid(
        Column::ProjectsCompleted,
        format!("{} is negative", self.projects_completed),
      ));
    }
    Ok(())
  }

  /// Days between joining and `as_of`; negative for future hires.
  pub fn days_in_company(&self, as_of: NaiveDate) -> i64 {
    (as_of - self.joining_date).num_days()
  }

  /// Completed calendar years between joining and `as_of`, never negative.
  pub fn tenure_years(&self, as_of: NaiveDate) -> u32 {
    let joined = self.joining_date;
    if as_of <= joined {
      return 0;
    }
    let mut years = as_of.year() - joined.year();
    if (as_of.month(), as_of.day()) < (joined.month(), joined.day()) {
      years -= 1;
    }
    years.max(0) as u32
  }

  /// Calendar quarter (1–4) of the joining month.
  pub fn joining_quarter(&self) -> u32 { (self.joining_date.month() - 1) / 3 + 1 }
}

fn check_range(value: f64, min: f64, max: f64) -> std::result::Result<(), String> {
  if !value.is_finite() {
    return Err(format!("{value} is not a finite number"));
  }
  if value < min || value > max {
    return Err(format!("{value} outside [{min}, {max}]"));
  }
  Ok(())
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a joining date as written by the ingestion pipeline.
///
/// Accepts ISO `YYYY-MM-DD`, US-style `M/D/YYYY` and ISO timestamps (the time
/// part is dropped).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  let s = s.trim();
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

/// Canonical text form used for storage and JSON output.
pub fn format_date(date: NaiveDate) -> String { date.format("%Y-%m-%d").to_string() }

mod joining_date {
  use chrono::NaiveDate;
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&super::format_date(*date))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    super::parse_date(&raw).map_err(D::Error::custom)
  }
}
