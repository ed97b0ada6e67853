//! Turnover risk scoring.
//!
//! Each employee gets an ordinal score from the first rule that matches:
//!
//! | score | rule |
//! |---|---|
//! | 3 | satisfaction < 60% |
//! | 2 | feedback < 3.0 |
//! | 1 | productivity below the department mean |
//! | 0 | otherwise |
//!
//! The rules are not additive: an unhappy, poorly rated employee scores 3.

use std::collections::BTreeMap;

use serde::Serialize;

use super::by_department;
use crate::{
  Employee, FactTable,
  stats::{mean, percent_ranks, round_to},
};

/// Scores at or above this count as high risk.
pub const HIGH_RISK: u8 = 2;

/// Departments are reported once they hold more than this many high-risk
/// employees.
pub const DEPARTMENT_ALERT_THRESHOLD: usize = 3;

pub fn risk_score(e: &Employee, department_mean_productivity: f64) -> u8 {
  if e.satisfaction_rate_percent < 60.0 {
    3
  } else if e.feedback_score < 3.0 {
    2
  } else if e.productivity_percent < department_mean_productivity {
    1
  } else {
    0
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
  pub name:              String,
  pub department:        String,
  pub risk_score:        u8,
  /// `PERCENT_RANK` of the salary across the whole population.
  pub salary_percentile: f64,
}

/// Score every employee, in input order.
pub fn assess_risk(table: &FactTable) -> Vec<RiskAssessment> {
  let department_means: BTreeMap<&str, f64> = by_department(table)
    .into_iter()
    .map(|(department, members)| {
      let values: Vec<f64> = members.iter().map(|e| e.productivity_percent).collect();
      (department, mean(&values).unwrap_or_default())
    })
    .collect();

  let salaries: Vec<f64> = table.iter().map(|e| e.salary).collect();
  let percentiles = percent_ranks(&salaries);

  table
    .iter()
    .zip(percentiles)
    .map(|(e, salary_percentile)| {
      let department_mean = department_means
        .get(e.department.as_str())
        .copied()
        .unwrap_or_default();
      RiskAssessment {
        name: e.name.clone(),
        department: e.department.clone(),
        risk_score: risk_score(e, department_mean),
        salary_percentile,
      }
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentRiskRow {
  pub department:            String,
  pub high_risk_count:       usize,
  /// Mean salary percentile of everyone in the department, four decimals.
  pub avg_salary_percentile: f64,
}

/// Departments with more than [`DEPARTMENT_ALERT_THRESHOLD`] high-risk
/// employees, most at-risk first.
pub fn turnover_risk(table: &FactTable) -> Vec<DepartmentRiskRow> {
  let assessments = assess_risk(table);

  let mut groups: BTreeMap<&str, Vec<&RiskAssessment>> = BTreeMap::new();
  for a in &assessments {
    groups.entry(a.department.as_str()).or_default().push(a);
  }

  let mut rows: Vec<_> = groups
    .into_iter()
    .filter_map(|(department, members)| {
      let high_risk_count = members.iter().filter(|a| a.risk_score >= HIGH_RISK).count();
      if high_risk_count <= DEPARTMENT_ALERT_THRESHOLD {
        return None;
      }
      let percentiles: Vec<f64> = members.iter().map(|a| a.salary_percentile).collect();
      Some(DepartmentRiskRow {
        department: department.to_owned(),
        high_risk_count,
        avg_salary_percentile: round_to(mean(&percentiles)?, 4),
      })
    })
    .collect();

  rows.sort_by(|a, b| {
    b.high_risk_count
      .cmp(&a.high_risk_count)
      .then_with(|| a.department.cmp(&b.department))
  });
  rows
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::report::fixtures::*;

  #[test]
  fn first_matching_rule_wins() {
    let unhappy_and_poorly_rated = Employee {
      satisfaction_rate_percent: 10.0,
      feedback_score: 1.0,
      productivity_percent: 0.0,
      ..emp("a", "IT")
    };
    assert_eq!(risk_score(&unhappy_and_poorly_rated, 50.0), 3);

    let poorly_rated = Employee { feedback_score: 2.9, productivity_percent: 0.0, ..emp("b", "IT") };
    assert_eq!(risk_score(&poorly_rated, 50.0), 2);

    let below_average = Employee { productivity_percent: 49.9, ..emp("c", "IT") };
    assert_eq!(risk_score(&below_average, 50.0), 1);

    let fine = Employee { productivity_percent: 50.0, ..emp("d", "IT") };
    assert_eq!(risk_score(&fine, 50.0), 0);

    let exactly_sixty = Employee { satisfaction_rate_percent: 60.0, ..emp("e", "IT") };
    assert_eq!(risk_score(&exactly_sixty, 0.0), 0);
  }

  #[test]
  fn assessments_use_department_mean_and_global_percentile() {
    let t = table(vec![
      Employee { productivity_percent: 60.0, salary: 3_000.0, ..emp("a", "IT") },
      Employee { productivity_percent: 80.0, salary: 9_000.0, ..emp("b", "IT") },
      Employee { productivity_percent: 10.0, salary: 6_000.0, ..emp("c", "Sales") },
    ]);
    let out = assess_risk(&t);
    assert_eq!(out[0].risk_score, 1);
    assert_eq!(out[1].risk_score, 0);
    // Alone in its department, so it matches its own mean.
    assert_eq!(out[2].risk_score, 0);
    assert_eq!(
      out.iter().map(|a| a.salary_percentile).collect::<Vec<_>>(),
      vec![0.0, 1.0, 0.5]
    );
  }

  #[test]
  fn departments_need_more_than_three_high_risk() {
    let mut rows = Vec::new();
    for i in 0..4 {
      rows.push(Employee { satisfaction_rate_percent: 40.0, ..emp(&format!("s{i}"), "Support") });
    }
    for i in 0..3 {
      rows.push(Employee { feedback_score: 2.0, ..emp(&format!("o{i}"), "Ops") });
    }
    rows.push(emp("fine", "Support"));

    let out = turnover_risk(&table(rows));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].department, "Support");
    assert_eq!(out[0].high_risk_count, 4);
    assert!((0.0..=1.0).contains(&out[0].avg_salary_percentile));
  }
}
