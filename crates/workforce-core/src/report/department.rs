//! Per-department aggregates: productivity, feedback and satisfaction
//! anomalies.

use serde::Serialize;

use super::by_department;
use crate::{
  FactTable,
  stats::{mean, round_to, std_dev},
};

// ─── Productivity ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentProductivityRow {
  pub department:       String,
  /// Mean productivity, one decimal place.
  pub avg_productivity: f64,
  /// Mean feedback score, two decimal places.
  pub avg_feedback:     f64,
  /// Employees with more than five completed projects.
  pub high_performers:  usize,
}

/// Ordered by average productivity, highest first (ties by department).
pub fn productivity_by_department(table: &FactTable) -> Vec<DepartmentProductivityRow> {
  let mut rows: Vec<_> = by_department(table)
    .into_iter()
    .map(|(department, members)| {
      let productivity: Vec<f64> = members.iter().map(|e| e.productivity_percent).collect();
      let feedback: Vec<f64> = members.iter().map(|e| e.feedback_score).collect();
      DepartmentProductivityRow {
        department:       department.to_owned(),
        avg_productivity: round_to(mean(&productivity).unwrap_or_default(), 1),
        avg_feedback:     round_to(mean(&feedback).unwrap_or_default(), 2),
        high_performers:  members.iter().filter(|e| e.projects_completed > 5).count(),
      }
    })
    .collect();

  rows.sort_by(|a, b| {
    b.avg_productivity
      .total_cmp(&a.avg_productivity)
      .then_with(|| a.department.cmp(&b.department))
  });
  rows
}

// ─── Feedback ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentFeedbackRow {
  pub department:     String,
  pub avg_feedback:   f64,
  pub employee_count: usize,
}

/// Mean feedback (two decimals) and head count per department, by name.
pub fn department_feedback(table: &FactTable) -> Vec<DepartmentFeedbackRow> {
  by_department(table)
    .into_iter()
    .map(|(department, members)| {
      let feedback: Vec<f64> = members.iter().map(|e| e.feedback_score).collect();
      DepartmentFeedbackRow {
        department:     department.to_owned(),
        avg_feedback:   round_to(mean(&feedback).unwrap_or_default(), 2),
        employee_count: members.len(),
      }
    })
    .collect()
}

// ─── Satisfaction anomalies ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentAnomalyRow {
  pub department:          String,
  pub avg_satisfaction:    f64,
  /// `None` for single-employee departments.
  pub stddev_satisfaction: Option<f64>,
  pub employee_count:      usize,
  /// (department mean − global mean) / global standard deviation.
  pub z_score:             f64,
}

/// Departments whose mean satisfaction lies more than two global standard
/// deviations from the global mean, most extreme first.
pub fn department_anomalies(table: &FactTable) -> Vec<DepartmentAnomalyRow> {
  let all: Vec<f64> = table.iter().map(|e| e.satisfaction_rate_percent).collect();
  let (Some(global_mean), Some(global_std)) = (mean(&all), std_dev(&all)) else {
    return Vec::new();
  };
  if global_std <= 0.0 {
    return Vec::new();
  }

  let mut rows: Vec<_> = by_department(table)
    .into_iter()
    .filter_map(|(department, members)| {
      let values: Vec<f64> = members.iter().map(|e| e.satisfaction_rate_percent).collect();
      let dept_mean = mean(&values)?;
      let deviation = dept_mean - global_mean;
      (deviation.abs() > 2.0 * global_std).then(|| DepartmentAnomalyRow {
        department:          department.to_owned(),
        avg_satisfaction:    dept_mean,
        stddev_satisfaction: std_dev(&values),
        employee_count:      values.len(),
        z_score:             deviation / global_std,
      })
    })
    .collect();

  rows.sort_by(|a, b| {
    b.z_score
      .abs()
      .total_cmp(&a.z_score.abs())
      .then_with(|| a.department.cmp(&b.department))
  });
  rows
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Employee, report::fixtures::*};

  #[test]
  fn productivity_aggregates_and_order() {
    let t = table(vec![
      Employee { productivity_percent: 80.0, feedback_score: 4.0, projects_completed: 8, ..emp("a", "IT") },
      Employee { productivity_percent: 61.0, feedback_score: 3.5, projects_completed: 2, ..emp("b", "IT") },
      Employee { productivity_percent: 90.0, feedback_score: 4.555, projects_completed: 6, ..emp("c", "Sales") },
    ]);
    let rows = productivity_by_department(&t);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].department, "Sales");
    assert_eq!(rows[0].avg_productivity, 90.0);
    assert_eq!(rows[0].high_performers, 1);
    assert_eq!(rows[1].department, "IT");
    assert_eq!(rows[1].avg_productivity, 70.5);
    assert_eq!(rows[1].avg_feedback, 3.75);
    assert_eq!(rows[1].high_performers, 1);
  }

  #[test]
  fn feedback_per_department() {
    let t = table(vec![
      Employee { feedback_score: 3.0, ..emp("a", "HR") },
      Employee { feedback_score: 4.0, ..emp("b", "HR") },
      Employee { feedback_score: 5.0, ..emp("c", "Finance") },
    ]);
    let rows = department_feedback(&t);
    assert_eq!(rows, vec![
      DepartmentFeedbackRow { department: "Finance".into(), avg_feedback: 5.0, employee_count: 1 },
      DepartmentFeedbackRow { department: "HR".into(), avg_feedback: 3.5, employee_count: 2 },
    ]);
  }

  #[test]
  fn flags_outlying_department() {
    let mut rows: Vec<Employee> = (0..20)
      .map(|i| Employee { satisfaction_rate_percent: 50.0, ..emp(&format!("e{i}"), "Ops") })
      .collect();
    rows.push(Employee { satisfaction_rate_percent: 100.0, ..emp("x", "Legal") });

    let out = department_anomalies(&table(rows));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].department, "Legal");
    assert_eq!(out[0].employee_count, 1);
    assert_eq!(out[0].stddev_satisfaction, None);
    assert_eq!(out[0].avg_satisfaction, 100.0);
    // Global mean 1100/21, sample stddev √52500/21, so z = 1000/√52500.
    assert!((out[0].z_score - 4.364_357_804_719_847).abs() < 1e-12);
  }

  #[test]
  fn uniform_satisfaction_has_no_anomalies() {
    let t = table(vec![emp("a", "IT"), emp("b", "Sales"), emp("c", "HR")]);
    assert!(department_anomalies(&t).is_empty());
  }
}
