//! Correlation reports.
//!
//! [`salary_correlation`] is the plain Pearson pair used by the salary
//! dashboards. The `*_correlation` analyses go further: they drop IQR
//! outliers, require a minimum sample, fit a regression line and test the
//! coefficient for significance. The `*_insights` reports summarise the same
//! cleaned rows.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF as _, StudentsT};

use crate::{
  Column, FactTable, ReportContext,
  stats::{linear_fit, mean, median, pearson, quantile_sorted, round_to, sorted},
};

/// Department excluded from the salary correlation as an outlier class.
pub const EXCLUDED_DEPARTMENT: &str = "Executive";

/// Multiplier applied to the interquartile range when dropping outliers.
const IQR_FENCE: f64 = 1.5;

/// Two-sided p-value below which a correlation counts as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

// ─── Salary correlation ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryCorrelationRow {
  pub salary_satisfaction: Option<f64>,
  pub salary_productivity: Option<f64>,
}

/// Pearson correlation of salary against satisfaction and productivity,
/// leaving out [`EXCLUDED_DEPARTMENT`].
pub fn salary_correlation(table: &FactTable) -> Vec<SalaryCorrelationRow> {
  let rows: Vec<_> = table
    .iter()
    .filter(|e| e.department != EXCLUDED_DEPARTMENT)
    .collect();
  if rows.is_empty() {
    return Vec::new();
  }

  let salary: Vec<f64> = rows.iter().map(|e| e.salary).collect();
  let satisfaction: Vec<f64> = rows.iter().map(|e| e.satisfaction_rate_percent).collect();
  let productivity: Vec<f64> = rows.iter().map(|e| e.productivity_percent).collect();

  vec![SalaryCorrelationRow {
    salary_satisfaction: pearson(&salary, &satisfaction),
    salary_productivity: pearson(&salary, &productivity),
  }]
}

// ─── Correlation analysis ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
  StrongPositive,
  ModeratePositive,
  Weak,
  ModerateNegative,
  StrongNegative,
}

impl CorrelationStrength {
  /// Bands are signed: `-0.8` classifies as strong negative.
  pub fn classify(r: f64) -> Self {
    match r {
      r if r >= 0.7 => Self::StrongPositive,
      r if r >= 0.3 => Self::ModeratePositive,
      r if r > -0.3 => Self::Weak,
      r if r > -0.7 => Self::ModerateNegative,
      _ => Self::StrongNegative,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationAnalysis {
  pub x:           Column,
  pub y:           Column,
  /// Rows left after outlier removal.
  pub sample_size: usize,
  pub pearson_r:   f64,
  pub r_squared:   f64,
  /// Two-sided p-value of the Pearson coefficient (t-test, n − 2 d.f.).
  pub p_value:     f64,
  /// `p_value < SIGNIFICANCE_LEVEL`.
  pub significant: bool,
  pub slope:       f64,
  pub intercept:   f64,
  pub strength:    CorrelationStrength,
}

/// Correlate two columns after dropping IQR outliers from each in turn.
///
/// Returns `None` when fewer than `min_sample` rows (and never fewer than
/// three) survive or either column is constant.
pub fn analyze_correlation(
  x: Column,
  y: Column,
  pairs: Vec<(f64, f64)>,
  min_sample: usize,
) -> Option<CorrelationAnalysis> {
  let pairs = clean_pairs(pairs, min_sample.max(3))?;

  let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
  let r = pearson(&xs, &ys)?;
  let (slope, intercept) = linear_fit(&xs, &ys)?;
  let p_value = pearson_p_value(r, xs.len())?;
  Some(CorrelationAnalysis {
    x,
    y,
    sample_size: xs.len(),
    pearson_r: round_to(r, 3),
    r_squared: round_to(r * r, 3),
    p_value,
    significant: p_value < SIGNIFICANCE_LEVEL,
    slope,
    intercept,
    strength: CorrelationStrength::classify(r),
  })
}

/// Two-sided p-value for a Pearson coefficient `r` over `n` pairs, from
/// `t = r·√((n − 2) / (1 − r²))` on Student's t with `n − 2` degrees of
/// freedom. `None` below three pairs.
pub fn pearson_p_value(r: f64, n: usize) -> Option<f64> {
  if n < 3 || !r.is_finite() {
    return None;
  }
  let unexplained = 1.0 - r * r;
  if unexplained <= 0.0 {
    return Some(0.0);
  }
  let df = (n - 2) as f64;
  let t = r * (df / unexplained).sqrt();
  let dist = StudentsT::new(0.0, 1.0, df).ok()?;
  Some((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Drop IQR outliers on the first value, then on the second. `None` when
/// fewer than `min_sample` pairs survive.
fn clean_pairs(pairs: Vec<(f64, f64)>, min_sample: usize) -> Option<Vec<(f64, f64)>> {
  let pairs = drop_outliers(pairs, |p| p.0);
  let pairs = drop_outliers(pairs, |p| p.1);
  (!pairs.is_empty() && pairs.len() >= min_sample).then_some(pairs)
}

/// Keep rows whose selected value lies within `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`.
fn drop_outliers(pairs: Vec<(f64, f64)>, value: impl Fn(&(f64, f64)) -> f64) -> Vec<(f64, f64)> {
  let ordered = sorted(&pairs.iter().map(&value).collect::<Vec<_>>());
  let (Some(q1), Some(q3)) = (quantile_sorted(&ordered, 0.25), quantile_sorted(&ordered, 0.75))
  else {
    return pairs;
  };
  let iqr = q3 - q1;
  let (low, high) = (q1 - IQR_FENCE * iqr, q3 + IQR_FENCE * iqr);
  pairs
    .into_iter()
    .filter(|p| (low..=high).contains(&value(p)))
    .collect()
}

/// Does satisfaction track feedback?
pub fn satisfaction_feedback_correlation(
  table: &FactTable,
  ctx: &ReportContext,
) -> Vec<CorrelationAnalysis> {
  let pairs = table
    .iter()
    .map(|e| (e.satisfaction_rate_percent, e.feedback_score))
    .collect();
  analyze_correlation(
    Column::SatisfactionRatePercent,
    Column::FeedbackScore,
    pairs,
    ctx.min_sample,
  )
  .into_iter()
  .collect()
}

/// Does pay track productivity?
pub fn productivity_salary_correlation(
  table: &FactTable,
  ctx: &ReportContext,
) -> Vec<CorrelationAnalysis> {
  let pairs = table.iter().map(|e| (e.productivity_percent, e.salary)).collect();
  analyze_correlation(Column::ProductivityPercent, Column::Salary, pairs, ctx.min_sample)
    .into_iter()
    .collect()
}

// ─── Insights ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivitySalaryInsights {
  /// Rows left after outlier removal.
  pub sample_size:                usize,
  /// Mean salary of employees at or above 75% productivity.
  pub top_quartile_avg_salary:    Option<f64>,
  /// Mean salary of employees at or below 25% productivity.
  pub bottom_quartile_avg_salary: Option<f64>,
  pub salary_gap:                 Option<f64>,
  /// Employees above 90% productivity paid below the median salary.
  pub underpaid_high_performers:  usize,
}

/// Pay gap between the most and least productive employees, computed on the
/// same outlier-free rows as [`productivity_salary_correlation`].
pub fn productivity_salary_insights(
  table: &FactTable,
  ctx: &ReportContext,
) -> Vec<ProductivitySalaryInsights> {
  let pairs = table.iter().map(|e| (e.productivity_percent, e.salary)).collect();
  let Some(pairs) = clean_pairs(pairs, ctx.min_sample) else {
    return Vec::new();
  };
  let salaries: Vec<f64> = pairs.iter().map(|&(_, salary)| salary).collect();
  let Some(median_salary) = median(&salaries) else {
    return Vec::new();
  };

  let top = avg_where(&pairs, |productivity| productivity >= 75.0);
  let bottom = avg_where(&pairs, |productivity| productivity <= 25.0);

  vec![ProductivitySalaryInsights {
    sample_size:                pairs.len(),
    top_quartile_avg_salary:    top,
    bottom_quartile_avg_salary: bottom,
    salary_gap:                 top.zip(bottom).map(|(t, b)| round_to(t - b, 2)),
    underpaid_high_performers:  pairs
      .iter()
      .filter(|&&(productivity, salary)| productivity > 90.0 && salary < median_salary)
      .count(),
  }]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionFeedbackInsights {
  /// Rows left after outlier removal.
  pub sample_size:                 usize,
  pub avg_satisfaction:            f64,
  pub avg_feedback:                f64,
  /// Expected feedback change for +10 points of satisfaction.
  pub feedback_gain_per_10_points: f64,
  /// Mean feedback of employees at or above 75% satisfaction.
  pub high_satisfaction_feedback:  Option<f64>,
  /// Mean feedback of employees at or below 25% satisfaction.
  pub low_satisfaction_feedback:   Option<f64>,
}

/// Key figures behind [`satisfaction_feedback_correlation`], on the same
/// outlier-free rows. No row when the regression is undefined.
pub fn satisfaction_feedback_insights(
  table: &FactTable,
  ctx: &ReportContext,
) -> Vec<SatisfactionFeedbackInsights> {
  let pairs = table
    .iter()
    .map(|e| (e.satisfaction_rate_percent, e.feedback_score))
    .collect();
  let Some(pairs) = clean_pairs(pairs, ctx.min_sample.max(2)) else {
    return Vec::new();
  };
  let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
  let (Some((slope, _)), Some(avg_satisfaction), Some(avg_feedback)) =
    (linear_fit(&xs, &ys), mean(&xs), mean(&ys))
  else {
    return Vec::new();
  };

  vec![SatisfactionFeedbackInsights {
    sample_size:                 pairs.len(),
    avg_satisfaction:            round_to(avg_satisfaction, 2),
    avg_feedback:                round_to(avg_feedback, 2),
    feedback_gain_per_10_points: round_to(slope * 10.0, 2),
    high_satisfaction_feedback:  avg_where(&pairs, |satisfaction| satisfaction >= 75.0),
    low_satisfaction_feedback:   avg_where(&pairs, |satisfaction| satisfaction <= 25.0),
  }]
}

/// Mean of the second value over pairs whose first value passes `keep`,
/// rounded to cents.
fn avg_where(pairs: &[(f64, f64)], keep: impl Fn(f64) -> bool) -> Option<f64> {
  let picked: Vec<f64> = pairs.iter().filter(|p| keep(p.0)).map(|p| p.1).collect();
  mean(&picked).map(|m| round_to(m, 2))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Employee, report::fixtures::*};

  #[test]
  fn executives_are_excluded() {
    let t = table(vec![
      Employee { salary: 3_000.0, satisfaction_rate_percent: 30.0, productivity_percent: 90.0, ..emp("a", "IT") },
      Employee { salary: 6_000.0, satisfaction_rate_percent: 60.0, productivity_percent: 60.0, ..emp("b", "IT") },
      Employee { salary: 9_000.0, satisfaction_rate_percent: 90.0, productivity_percent: 30.0, ..emp("c", "IT") },
      Employee { salary: 90_000.0, satisfaction_rate_percent: 0.0, productivity_percent: 100.0, ..emp("x", "Executive") },
    ]);
    let row = &salary_correlation(&t)[0];
    assert!((row.salary_satisfaction.unwrap() - 1.0).abs() < 1e-9);
    assert!((row.salary_productivity.unwrap() + 1.0).abs() < 1e-9);
  }

  #[test]
  fn only_executives_means_no_rows() {
    let t = table(vec![emp("x", "Executive")]);
    assert!(salary_correlation(&t).is_empty());
  }

  #[test]
  fn constant_column_has_undefined_correlation() {
    let t = table(vec![emp("a", "IT"), emp("b", "IT")]);
    assert_eq!(salary_correlation(&t)[0].salary_satisfaction, None);
  }

  #[test]
  fn analysis_fits_line_and_classifies() {
    let pairs: Vec<(f64, f64)> = (0..40).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
    let a = analyze_correlation(Column::ProductivityPercent, Column::Salary, pairs, 30).unwrap();
    assert_eq!(a.sample_size, 40);
    assert_eq!(a.pearson_r, 1.0);
    assert_eq!(a.r_squared, 1.0);
    assert!(a.p_value < 1e-12);
    assert!(a.significant);
    assert!((a.slope - 2.0).abs() < 1e-9);
    assert!((a.intercept - 1.0).abs() < 1e-9);
    assert_eq!(a.strength, CorrelationStrength::StrongPositive);
  }

  #[test]
  fn analysis_drops_outliers_and_requires_sample() {
    let mut pairs: Vec<(f64, f64)> = (0..30).map(|i| (i as f64, i as f64)).collect();
    pairs.push((1_000.0, 0.0));
    let a = analyze_correlation(Column::ProductivityPercent, Column::Salary, pairs, 30).unwrap();
    assert_eq!(a.sample_size, 30);
    assert_eq!(a.pearson_r, 1.0);

    let few: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, i as f64)).collect();
    assert!(analyze_correlation(Column::ProductivityPercent, Column::Salary, few, 30).is_none());
  }

  #[test]
  fn strength_bands() {
    assert_eq!(CorrelationStrength::classify(0.85), CorrelationStrength::StrongPositive);
    assert_eq!(CorrelationStrength::classify(0.3), CorrelationStrength::ModeratePositive);
    assert_eq!(CorrelationStrength::classify(0.0), CorrelationStrength::Weak);
    assert_eq!(CorrelationStrength::classify(-0.5), CorrelationStrength::ModerateNegative);
    assert_eq!(CorrelationStrength::classify(-0.95), CorrelationStrength::StrongNegative);
  }

  #[test]
  fn insights_gap_and_underpaid() {
    let t = table(vec![
      Employee { productivity_percent: 95.0, salary: 4_000.0, ..emp("a", "IT") },
      Employee { productivity_percent: 80.0, salary: 8_000.0, ..emp("b", "IT") },
      Employee { productivity_percent: 20.0, salary: 5_000.0, ..emp("c", "IT") },
      Employee { productivity_percent: 50.0, salary: 7_000.0, ..emp("d", "IT") },
    ]);
    let ctx = ReportContext { min_sample: 4, ..ctx() };
    let i = &productivity_salary_insights(&t, &ctx)[0];
    assert_eq!(i.sample_size, 4);
    assert_eq!(i.top_quartile_avg_salary, Some(6_000.0));
    assert_eq!(i.bottom_quartile_avg_salary, Some(5_000.0));
    assert_eq!(i.salary_gap, Some(1_000.0));
    assert_eq!(i.underpaid_high_performers, 1);
  }

  #[test]
  fn p_value_matches_students_t() {
    let p = pearson_p_value(0.5, 30).unwrap();
    assert!((p - 0.004_899_933_667).abs() < 1e-8, "p = {p}");
    let p = pearson_p_value(-0.3, 30).unwrap();
    assert!((p - 0.107_245_948_058).abs() < 1e-8, "p = {p}");
    assert_eq!(pearson_p_value(0.9, 2), None);
  }

  #[test]
  fn weak_analysis_is_not_significant() {
    // Large alternating residuals around a shallow slope keep r weak.
    let pairs: Vec<(f64, f64)> = (0..30)
      .map(|i| (i as f64, i as f64 * 0.1 + if i % 2 == 0 { 4.0 } else { -4.0 }))
      .collect();
    let a = analyze_correlation(Column::SatisfactionRatePercent, Column::FeedbackScore, pairs, 30)
      .unwrap();
    assert!(a.pearson_r.abs() < 0.3);
    assert!(a.p_value > SIGNIFICANCE_LEVEL);
    assert!(!a.significant);
  }

  fn productivity_salary_rows() -> Vec<Employee> {
    (0..40)
      .map(|i| Employee {
        productivity_percent: 10.0 + 2.0 * i as f64,
        salary: 3_000.0 + 100.0 * i as f64,
        ..emp(&format!("e{i}"), "IT")
      })
      .collect()
  }

  #[test]
  fn insights_ignore_salary_outliers() {
    let mut rows = productivity_salary_rows();
    rows.push(Employee { productivity_percent: 79.0, salary: 1_000_000.0, ..emp("whale", "IT") });
    let t = table(rows);

    let analysis = &productivity_salary_correlation(&t, &ctx())[0];
    let i = &productivity_salary_insights(&t, &ctx())[0];
    assert_eq!(i.sample_size, analysis.sample_size);
    assert_eq!(i.sample_size, 40);
    assert_eq!(i.top_quartile_avg_salary, Some(6_600.0));
    assert_eq!(i.bottom_quartile_avg_salary, Some(3_350.0));
    assert_eq!(i.salary_gap, Some(3_250.0));
    assert_eq!(i.underpaid_high_performers, 0);
  }

  #[test]
  fn insights_need_minimum_sample() {
    let t = table(productivity_salary_rows().into_iter().take(10).collect());
    assert!(productivity_salary_insights(&t, &ctx()).is_empty());
    assert!(satisfaction_feedback_insights(&t, &ctx()).is_empty());
  }

  #[test]
  fn satisfaction_insights_report_gain_and_extremes() {
    let rows: Vec<Employee> = (0..40)
      .map(|i| {
        let satisfaction = 2.5 * i as f64;
        Employee {
          satisfaction_rate_percent: satisfaction,
          feedback_score: 1.0 + satisfaction / 25.0,
          ..emp(&format!("e{i}"), "IT")
        }
      })
      .collect();
    let i = &satisfaction_feedback_insights(&table(rows), &ctx())[0];
    assert_eq!(i.sample_size, 40);
    assert_eq!(i.avg_satisfaction, 48.75);
    assert_eq!(i.avg_feedback, 2.95);
    assert_eq!(i.feedback_gain_per_10_points, 0.4);
    assert_eq!(i.high_satisfaction_feedback, Some(4.45));
    assert_eq!(i.low_satisfaction_feedback, Some(1.5));
  }
}
