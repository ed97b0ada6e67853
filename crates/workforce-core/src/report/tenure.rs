//! Tenure-based reports: turnover by tenure group and per-employee tenure.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
  FactTable, ReportContext,
  stats::{ntile, round_to},
};

// ─── Turnover by tenure ──────────────────────────────────────────────────────

/// Tenure bucket by completed years in the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, strum::Display)]
pub enum TenureGroup {
  /// Less than two years.
  Junior,
  /// Two up to (not including) five years.
  Mid,
  /// Five years or more.
  Senior,
}

impl TenureGroup {
  pub fn for_years(years: u32) -> Self {
    match years {
      0..2 => Self::Junior,
      2..5 => Self::Mid,
      _ => Self::Senior,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenureGroupRow {
  pub tenure_group:    TenureGroup,
  pub total_employees: usize,
  /// Employees with satisfaction below 50%.
  pub dissatisfied:    usize,
}

/// Employee counts per tenure group, ordered by the shortest tenure present in
/// each group. Groups with no employees are omitted.
pub fn turnover_by_tenure(table: &FactTable, ctx: &ReportContext) -> Vec<TenureGroupRow> {
  // group -> (row, minimum days in company)
  let mut groups: BTreeMap<TenureGroup, (TenureGroupRow, i64)> = BTreeMap::new();

  for e in table.rows() {
    let group = TenureGroup::for_years(e.tenure_years(ctx.as_of));
    let days = e.days_in_company(ctx.as_of);
    let (row, min_days) = groups.entry(group).or_insert_with(|| {
      (
        TenureGroupRow { tenure_group: group, total_employees: 0, dissatisfied: 0 },
        days,
      )
    });
    row.total_employees += 1;
    if e.satisfaction_rate_percent < 50.0 {
      row.dissatisfied += 1;
    }
    *min_days = (*min_days).min(days);
  }

  let mut rows: Vec<_> = groups.into_values().collect();
  rows.sort_by_key(|(row, min_days)| (*min_days, row.tenure_group));
  rows.into_iter().map(|(row, _)| row).collect()
}

// ─── Employee tenure ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeTenureRow {
  pub name:              String,
  pub department:        String,
  pub days_in_company:   i64,
  /// `None` while the employee has less than one completed year.
  pub projects_per_year: Option<f64>,
  /// 1–4 by joining order across the whole population (1 = earliest).
  pub tenure_quartile:   usize,
}

/// Per-employee tenure, in joining-date order (ties by name).
pub fn employee_tenure(table: &FactTable, ctx: &ReportContext) -> Vec<EmployeeTenureRow> {
  let mut ordered: Vec<_> = table.rows().iter().collect();
  ordered.sort_by(|a, b| {
    a.joining_date
      .cmp(&b.joining_date)
      .then_with(|| a.name.cmp(&b.name))
  });

  let n = ordered.len();
  ordered
    .into_iter()
    .enumerate()
    .map(|(pos, e)| {
      let years = e.tenure_years(ctx.as_of);
      EmployeeTenureRow {
        name:              e.name.clone(),
        department:        e.department.clone(),
        days_in_company:   e.days_in_company(ctx.as_of),
        projects_per_year: (years >= 1)
          .then(|| round_to(e.projects_completed as f64 / f64::from(years), 2)),
        tenure_quartile:   ntile(pos, n, 4),
      }
    })
    .collect()
}
