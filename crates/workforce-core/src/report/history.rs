//! Time-ordered reports: rolling performance history and joining-year cohorts.

use std::collections::BTreeMap;

use chrono::Datelike as _;
use serde::Serialize;

use super::by_department;
use crate::{
  FactTable,
  stats::{mean, round_to},
};

/// Rows in the trailing window: the current row and up to three before it.
const WINDOW: usize = 4;

/// Below this magnitude a cohort mean is treated as zero for growth purposes.
const GROWTH_BASE_EPSILON: f64 = 1e-9;

// ─── Performance history ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceHistoryRow {
  pub name:                     String,
  pub department:               String,
  pub year:                     i32,
  pub quarter:                  u32,
  pub rolling_avg_productivity: f64,
  pub total_projects:           i64,
}

/// Trailing-window productivity and project totals within each department,
/// ordered by joining date (ties by name).
pub fn performance_history(table: &FactTable) -> Vec<PerformanceHistoryRow> {
  let mut out = Vec::with_capacity(table.len());

  for (department, mut members) in by_department(table) {
    members.sort_by(|a, b| {
      a.joining_date
        .cmp(&b.joining_date)
        .then_with(|| a.name.cmp(&b.name))
    });

    for (i, e) in members.iter().enumerate() {
      let window = &members[(i + 1).saturating_sub(WINDOW)..=i];
      let productivity: Vec<f64> = window.iter().map(|w| w.productivity_percent).collect();
      out.push(PerformanceHistoryRow {
        name:                     e.name.clone(),
        department:               department.to_owned(),
        year:                     e.joining_date.year(),
        quarter:                  e.joining_quarter(),
        rolling_avg_productivity: round_to(mean(&productivity).unwrap_or_default(), 2),
        total_projects:           window.iter().map(|w| w.projects_completed).sum(),
      });
    }
  }

  out
}

// ─── Cohorts ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortRow {
  pub cohort_year:              i32,
  pub department:               String,
  pub employee_count:           usize,
  pub avg_productivity:         f64,
  /// Mean productivity of the department's next joining-year cohort.
  pub next_cohort_productivity: Option<f64>,
  /// Percent change to the next cohort; `None` without a next cohort or when
  /// this cohort's mean is zero.
  pub growth_percent:           Option<f64>,
}

/// One row per (department, joining year), ordered by department then year.
pub fn cohort_analysis(table: &FactTable) -> Vec<CohortRow> {
  let mut cohorts: BTreeMap<(&str, i32), Vec<f64>> = BTreeMap::new();
  for e in table.rows() {
    cohorts
      .entry((e.department.as_str(), e.joining_date.year()))
      .or_default()
      .push(e.productivity_percent);
  }

  let cohorts: Vec<((&str, i32), usize, f64)> = cohorts
    .into_iter()
    .filter_map(|(key, values)| Some((key, values.len(), mean(&values)?)))
    .collect();

  cohorts
    .iter()
    .enumerate()
    .map(|(i, &((department, year), count, base))| {
      let next = cohorts
        .get(i + 1)
        .filter(|((next_department, _), _, _)| *next_department == department)
        .map(|&(_, _, m)| m);
      CohortRow {
        cohort_year: year,
        department: department.to_owned(),
        employee_count: count,
        avg_productivity: round_to(base, 2),
        next_cohort_productivity: next.map(|m| round_to(m, 2)),
        growth_percent: next.and_then(|m| growth_percent(base, m)),
      }
    })
    .collect()
}

fn growth_percent(base: f64, next: f64) -> Option<f64> {
  if base.abs() < GROWTH_BASE_EPSILON {
    return None;
  }
  Some(round_to((next - base) / base * 100.0, 2))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Employee, report::fixtures::*};

  fn joined(name: &str, department: &str, when: chrono::NaiveDate, productivity: f64) -> Employee {
    Employee {
      joining_date: when,
      productivity_percent: productivity,
      projects_completed: 2,
      ..emp(name, department)
    }
  }

  #[test]
  fn rolling_window_covers_four_rows() {
    let t = table(vec![
      joined("a", "IT", date(2020, 1, 10), 10.0),
      joined("b", "IT", date(2020, 5, 10), 20.0),
      joined("c", "IT", date(2020, 8, 10), 30.0),
      joined("d", "IT", date(2020, 11, 10), 40.0),
      joined("e", "IT", date(2021, 2, 10), 50.0),
      joined("z", "HR", date(2019, 3, 1), 90.0),
    ]);
    let rows = performance_history(&t);

    // Departments in name order.
    assert_eq!(rows[0].department, "HR");
    assert_eq!(rows[0].rolling_avg_productivity, 90.0);

    let it: Vec<_> = rows.iter().filter(|r| r.department == "IT").collect();
    let avgs: Vec<f64> = it.iter().map(|r| r.rolling_avg_productivity).collect();
    assert_eq!(avgs, vec![10.0, 15.0, 20.0, 25.0, 35.0]);
    let totals: Vec<i64> = it.iter().map(|r| r.total_projects).collect();
    assert_eq!(totals, vec![2, 4, 6, 8, 8]);
    let quarters: Vec<u32> = it.iter().map(|r| r.quarter).collect();
    assert_eq!(quarters, vec![1, 2, 3, 4, 1]);
    assert_eq!(it[4].year, 2021);
  }

  #[test]
  fn cohort_lead_and_growth() {
    let t = table(vec![
      joined("a", "IT", date(2019, 1, 1), 50.0),
      joined("b", "IT", date(2019, 6, 1), 70.0),
      joined("c", "IT", date(2021, 1, 1), 90.0),
      joined("d", "Sales", date(2019, 1, 1), 40.0),
    ]);
    let rows = cohort_analysis(&t);
    assert_eq!(rows.len(), 3);

    assert_eq!((rows[0].department.as_str(), rows[0].cohort_year), ("IT", 2019));
    assert_eq!(rows[0].employee_count, 2);
    assert_eq!(rows[0].avg_productivity, 60.0);
    assert_eq!(rows[0].next_cohort_productivity, Some(90.0));
    assert_eq!(rows[0].growth_percent, Some(50.0));

    // Last cohort in a department has no lead, even if another department follows.
    assert_eq!(rows[1].cohort_year, 2021);
    assert_eq!(rows[1].next_cohort_productivity, None);
    assert_eq!(rows[1].growth_percent, None);
    assert_eq!(rows[2].department, "Sales");
  }

  #[test]
  fn equal_cohorts_grow_zero_percent() {
    let t = table(vec![
      joined("a", "IT", date(2019, 1, 1), 64.0),
      joined("b", "IT", date(2020, 1, 1), 64.0),
    ]);
    assert_eq!(cohort_analysis(&t)[0].growth_percent, Some(0.0));
  }

  #[test]
  fn zero_base_cohort_has_no_growth() {
    let t = table(vec![
      joined("a", "IT", date(2019, 1, 1), 0.0),
      joined("b", "IT", date(2020, 1, 1), 50.0),
    ]);
    let rows = cohort_analysis(&t);
    assert_eq!(rows[0].next_cohort_productivity, Some(50.0));
    assert_eq!(rows[0].growth_percent, None);
  }
}
