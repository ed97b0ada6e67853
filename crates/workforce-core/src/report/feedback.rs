//! Feedback-score reports: distribution summary and top performers.

use serde::Serialize;

use crate::{
  FactTable, ReportContext,
  stats::{mean, quantile_sorted, sorted, std_dev},
};

/// Descriptive statistics of `feedback_score` over the whole table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
  pub count:  usize,
  pub mean:   f64,
  pub std:    Option<f64>,
  pub min:    f64,
  pub q1:     f64,
  pub median: f64,
  pub q3:     f64,
  pub max:    f64,
}

pub fn feedback_summary(table: &FactTable) -> Vec<FeedbackSummary> {
  let values: Vec<f64> = table.iter().map(|e| e.feedback_score).collect();
  describe(&values).into_iter().collect()
}

fn describe(values: &[f64]) -> Option<FeedbackSummary> {
  let ordered = sorted(values);
  let q = |p| quantile_sorted(&ordered, p);
  Some(FeedbackSummary {
    count:  values.len(),
    mean:   mean(values)?,
    std:    std_dev(values),
    min:    *ordered.first()?,
    q1:     q(0.25)?,
    median: q(0.5)?,
    q3:     q(0.75)?,
    max:    *ordered.last()?,
  })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformerRow {
  pub name:           String,
  pub feedback_score: f64,
  pub department:     String,
  pub position:       String,
}

/// The `ctx.top_n` best-rated employees, ties broken by name.
pub fn top_performers(table: &FactTable, ctx: &ReportContext) -> Vec<TopPerformerRow> {
  let mut ranked: Vec<_> = table.iter().collect();
  ranked.sort_by(|a, b| {
    b.feedback_score
      .total_cmp(&a.feedback_score)
      .then_with(|| a.name.cmp(&b.name))
  });
  ranked
    .into_iter()
    .take(ctx.top_n)
    .map(|e| TopPerformerRow {
      name:           e.name.clone(),
      feedback_score: e.feedback_score,
      department:     e.department.clone(),
      position:       e.position.clone(),
    })
    .collect()
}
