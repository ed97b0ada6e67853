//! Salary bands: the static reference table and the lookups built on it.

use serde::Serialize;

use crate::{
  FactTable,
  stats::{mean, round_to},
};

/// One row of the salary-band reference table. The range is
/// `[min_salary, max_salary)`; the top band is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBand {
  pub band:            &'static str,
  pub min_salary:      f64,
  pub max_salary:      Option<f64>,
  pub benchmark_ratio: f64,
}

impl SalaryBand {
  pub fn contains(&self, salary: f64) -> bool {
    salary >= self.min_salary && self.max_salary.is_none_or(|max| salary < max)
  }
}

pub static SALARY_BANDS: [SalaryBand; 4] = [
  SalaryBand { band: "Junior", min_salary: 0.0, max_salary: Some(5_000.0), benchmark_ratio: 0.8 },
  SalaryBand { band: "Mid", min_salary: 5_000.0, max_salary: Some(10_000.0), benchmark_ratio: 1.0 },
  SalaryBand {
    band:            "Senior",
    min_salary:      10_000.0,
    max_salary:      Some(20_000.0),
    benchmark_ratio: 1.2,
  },
  SalaryBand { band: "Executive", min_salary: 20_000.0, max_salary: None, benchmark_ratio: 1.5 },
];

/// The reference table itself.
pub fn salary_bands() -> Vec<SalaryBand> { SALARY_BANDS.to_vec() }

/// The band a salary falls into; `None` only for negative salaries.
pub fn salary_band_for(salary: f64) -> Option<&'static SalaryBand> {
  SALARY_BANDS.iter().find(|b| b.contains(salary))
}

// ─── Distribution ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBandDistributionRow {
  pub band:             &'static str,
  pub employee_count:   usize,
  pub avg_salary:       f64,
  pub avg_productivity: f64,
}

/// Employees joined onto the band table, in band order; empty bands omitted.
pub fn salary_band_distribution(table: &FactTable) -> Vec<SalaryBandDistributionRow> {
  SALARY_BANDS
    .iter()
    .filter_map(|band| {
      let members: Vec<_> = table.iter().filter(|e| band.contains(e.salary)).collect();
      let salaries: Vec<f64> = members.iter().map(|e| e.salary).collect();
      let productivity: Vec<f64> = members.iter().map(|e| e.productivity_percent).collect();
      Some(SalaryBandDistributionRow {
        band:             band.band,
        employee_count:   members.len(),
        avg_salary:       round_to(mean(&salaries)?, 2),
        avg_productivity: round_to(mean(&productivity)?, 1),
      })
    })
    .collect()
}
