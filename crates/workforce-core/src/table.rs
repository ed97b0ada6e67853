//! [`FactTable`]: an immutable, validated snapshot of `main_table`.

use std::ops::Deref;

use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator as _;

use crate::{Column, Employee, Error, Result};

/// A validated snapshot of the fact table. Reports borrow it; nothing
/// mutates it after construction.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FactTable {
  rows: Vec<Employee>,
}

impl FactTable {
  /// Build a snapshot, validating every row.
  pub fn new(rows: Vec<Employee>) -> Result<Self> {
    for (i, row) in rows.iter().enumerate() {
      row.validate(i)?;
    }
    Ok(Self { rows })
  }

  /// Build a snapshot from a JSON array of row objects.
  ///
  /// Every object is checked for all fact-table columns before
  /// deserialisation, so a missing or `null` field is reported by name.
  pub fn from_json(raw: &str) -> Result<Self> {
    let values: Vec<Value> = serde_json::from_str(raw)?;
    let mut rows = Vec::with_capacity(values.len());
    for value in values {
      if let Some(obj) = value.as_object() {
        if let Some(missing) =
          Column::iter().find(|c| obj.get(c.as_str()).is_none_or(Value::is_null))
        {
          return Err(Error::MissingColumn(missing));
        }
      }
      rows.push(serde_json::from_value(value)?);
    }
    Self::new(rows)
  }

  pub fn rows(&self) -> &[Employee] { &self.rows }

  pub fn into_rows(self) -> Vec<Employee> { self.rows }

  /// A new snapshot holding only the rows accepted by `filter`.
  pub fn filtered(&self, filter: &EmployeeFilter) -> Self {
    Self {
      rows: self.rows.iter().filter(|e| filter.matches(e)).cloned().collect(),
    }
  }
}

impl Deref for FactTable {
  type Target = [Employee];

  fn deref(&self) -> &[Employee] { &self.rows }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Row filter applied before running reports. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
  pub department:       Option<String>,
  pub min_feedback:     Option<f64>,
  pub min_satisfaction: Option<f64>,
}

impl EmployeeFilter {
  pub fn is_empty(&self) -> bool {
    self.department.is_none() && self.min_feedback.is_none() && self.min_satisfaction.is_none()
  }

  pub fn matches(&self, e: &Employee) -> bool {
    self.department.as_deref().is_none_or(|d| e.department == d)
      && self.min_feedback.is_none_or(|f| e.feedback_score >= f)
      && self.min_satisfaction.is_none_or(|s| e.satisfaction_rate_percent >= s)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ROWS: &str = r#"[
    {"name": "Ana", "department": "IT", "position": "Developer", "salary": 7000,
     "productivity_percent": 80, "feedback_score": 4.5, "satisfaction_rate_percent": 90,
     "projects_completed": 12, "joining_date": "1/15/2019"},
    {"name": "Bruno", "department": "Sales", "position": "Manager", "salary": 9000,
     "productivity_percent": 60, "feedback_score": 2.5, "satisfaction_rate_percent": 40,
     "projects_completed": 3, "joining_date": "2021-07-01"}
  ]"#;

  #[test]
  fn from_json_loads_rows() {
    let table = FactTable::from_json(ROWS).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].name, "Ana");
    assert_eq!(table[1].joining_date.to_string(), "2021-07-01");
  }

  #[test]
  fn from_json_names_missing_column() {
    let raw = r#"[{"name": "Ana", "department": "IT", "position": "Dev", "salary": 1,
      "productivity_percent": 1, "feedback_score": 1, "projects_completed": 1,
      "joining_date": "2020-01-01"}]"#;
    let err = FactTable::from_json(raw).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(Column::SatisfactionRatePercent)));
    assert_eq!(err.to_string(), "missing column: satisfaction_rate_percent");
  }

  #[test]
  fn from_json_treats_null_as_missing() {
    let raw = r#"[{"name": "Ana", "department": "IT", "position": "Dev", "salary": null,
      "productivity_percent": 1, "feedback_score": 1, "satisfaction_rate_percent": 1,
      "projects_completed": 1, "joining_date": "2020-01-01"}]"#;
    let err = FactTable::from_json(raw).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(Column::Salary)));
    assert_eq!(err.to_string(), "missing column: salary");
  }

  #[test]
  fn from_json_empty_array_is_empty_table() {
    let table = FactTable::from_json("[]").unwrap();
    assert!(table.is_empty());
  }

  #[test]
  fn filter_by_department_and_thresholds() {
    let table = FactTable::from_json(ROWS).unwrap();

    let it = table.filtered(&EmployeeFilter {
      department: Some("IT".into()),
      ..Default::default()
    });
    assert_eq!(it.len(), 1);

    let satisfied = table.filtered(&EmployeeFilter {
      min_satisfaction: Some(50.0),
      ..Default::default()
    });
    assert_eq!(satisfied.len(), 1);
    assert_eq!(satisfied[0].name, "Ana");

    assert!(EmployeeFilter::default().is_empty());
    assert_eq!(table.filtered(&EmployeeFilter::default()).len(), 2);
  }
}
