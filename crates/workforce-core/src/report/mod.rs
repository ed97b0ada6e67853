//! The report catalog.
//!
//! Each report is a pure function over a borrowed [`FactTable`] and a
//! [`ReportContext`] that returns its rows. Reports never fail on data that
//! made it into a `FactTable`: an empty table yields empty rows, and any
//! undefined arithmetic surfaces as `None` in the affected column.

pub mod correlation;
pub mod department;
pub mod feedback;
pub mod history;
pub mod risk;
pub mod salary;
pub mod tenure;

use std::{collections::BTreeMap, str::FromStr as _};

use chrono::NaiveDate;
use serde::Serialize;
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::{Employee, Error, FactTable, Result};

// ─── Context ─────────────────────────────────────────────────────────────────

/// Parameters shared by every report invocation.
#[derive(Debug, Clone)]
pub struct ReportContext {
  /// Reference date for all tenure calculations ("current date").
  pub as_of:      NaiveDate,
  /// Number of rows returned by ranking reports.
  pub top_n:      usize,
  /// Minimum sample size for regression-style correlation analyses.
  pub min_sample: usize,
}

impl ReportContext {
  pub const DEFAULT_TOP_N: usize = 5;
  pub const DEFAULT_MIN_SAMPLE: usize = 30;

  pub fn new(as_of: NaiveDate) -> Self {
    Self {
      as_of,
      top_n: Self::DEFAULT_TOP_N,
      min_sample: Self::DEFAULT_MIN_SAMPLE,
    }
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Every report the library can produce, in catalog order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  EnumIter,
  EnumString,
  IntoStaticStr,
  strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum ReportKind {
  TurnoverByTenure,
  ProductivityByDepartment,
  SalaryCorrelation,
  PerformanceHistory,
  EmployeeTenure,
  SalaryBands,
  SalaryBandDistribution,
  DepartmentAnomalies,
  CohortAnalysis,
  TurnoverRisk,
  FeedbackSummary,
  TopPerformers,
  DepartmentFeedback,
  SatisfactionFeedbackCorrelation,
  SatisfactionFeedbackInsights,
  ProductivitySalaryCorrelation,
  ProductivitySalaryInsights,
}

impl ReportKind {
  /// Parse a snake_case report name.
  pub fn parse(name: &str) -> Result<Self> {
    Self::from_str(name.trim()).map_err(|_| Error::UnknownReport(name.to_owned()))
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

/// The rows produced by one report, tagged with the report name when
/// serialised: `{"report": "turnover_by_tenure", "rows": [...]}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "report", content = "rows", rename_all = "snake_case")]
pub enum ReportRows {
  TurnoverByTenure(Vec<tenure::TenureGroupRow>),
  ProductivityByDepartment(Vec<department::DepartmentProductivityRow>),
  SalaryCorrelation(Vec<correlation::SalaryCorrelationRow>),
  PerformanceHistory(Vec<history::PerformanceHistoryRow>),
  EmployeeTenure(Vec<tenure::EmployeeTenureRow>),
  SalaryBands(Vec<salary::SalaryBand>),
  SalaryBandDistribution(Vec<salary::SalaryBandDistributionRow>),
  DepartmentAnomalies(Vec<department::DepartmentAnomalyRow>),
  CohortAnalysis(Vec<history::CohortRow>),
  TurnoverRisk(Vec<risk::DepartmentRiskRow>),
  FeedbackSummary(Vec<feedback::FeedbackSummary>),
  TopPerformers(Vec<feedback::TopPerformerRow>),
  DepartmentFeedback(Vec<department::DepartmentFeedbackRow>),
  SatisfactionFeedbackCorrelation(Vec<correlation::CorrelationAnalysis>),
  SatisfactionFeedbackInsights(Vec<correlation::SatisfactionFeedbackInsights>),
  ProductivitySalaryCorrelation(Vec<correlation::CorrelationAnalysis>),
  ProductivitySalaryInsights(Vec<correlation::ProductivitySalaryInsights>),
}

impl ReportRows {
  pub fn kind(&self) -> ReportKind {
    match self {
      Self::TurnoverByTenure(_) => ReportKind::TurnoverByTenure,
      Self::ProductivityByDepartment(_) => ReportKind::ProductivityByDepartment,
      Self::SalaryCorrelation(_) => ReportKind::SalaryCorrelation,
      Self::PerformanceHistory(_) => ReportKind::PerformanceHistory,
      Self::EmployeeTenure(_) => ReportKind::EmployeeTenure,
      Self::SalaryBands(_) => ReportKind::SalaryBands,
      Self::SalaryBandDistribution(_) => ReportKind::SalaryBandDistribution,
      Self::DepartmentAnomalies(_) => ReportKind::DepartmentAnomalies,
      Self::CohortAnalysis(_) => ReportKind::CohortAnalysis,
      Self::TurnoverRisk(_) => ReportKind::TurnoverRisk,
      Self::FeedbackSummary(_) => ReportKind::FeedbackSummary,
      Self::TopPerformers(_) => ReportKind::TopPerformers,
      Self::DepartmentFeedback(_) => ReportKind::DepartmentFeedback,
      Self::SatisfactionFeedbackCorrelation(_) => ReportKind::SatisfactionFeedbackCorrelation,
      Self::SatisfactionFeedbackInsights(_) => ReportKind::SatisfactionFeedbackInsights,
      Self::ProductivitySalaryCorrelation(_) => ReportKind::ProductivitySalaryCorrelation,
      Self::ProductivitySalaryInsights(_) => ReportKind::ProductivitySalaryInsights,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      Self::TurnoverByTenure(r) => r.len(),
      Self::ProductivityByDepartment(r) => r.len(),
      Self::SalaryCorrelation(r) => r.len(),
      Self::PerformanceHistory(r) => r.len(),
      Self::EmployeeTenure(r) => r.len(),
      Self::SalaryBands(r) => r.len(),
      Self::SalaryBandDistribution(r) => r.len(),
      Self::DepartmentAnomalies(r) => r.len(),
      Self::CohortAnalysis(r) => r.len(),
      Self::TurnoverRisk(r) => r.len(),
      Self::FeedbackSummary(r) => r.len(),
      Self::TopPerformers(r) => r.len(),
      Self::DepartmentFeedback(r) => r.len(),
      Self::SatisfactionFeedbackCorrelation(r) => r.len(),
      Self::SatisfactionFeedbackInsights(r) => r.len(),
      Self::ProductivitySalaryCorrelation(r) => r.len(),
      Self::ProductivitySalaryInsights(r) => r.len(),
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Run a single report.
pub fn run(kind: ReportKind, table: &FactTable, ctx: &ReportContext) -> ReportRows {
  let rows = match kind {
    ReportKind::TurnoverByTenure => {
      ReportRows::TurnoverByTenure(tenure::turnover_by_tenure(table, ctx))
    }
    ReportKind::ProductivityByDepartment => {
      ReportRows::ProductivityByDepartment(department::productivity_by_department(table))
    }
    ReportKind::SalaryCorrelation => {
      ReportRows::SalaryCorrelation(correlation::salary_correlation(table))
    }
    ReportKind::PerformanceHistory => {
      ReportRows::PerformanceHistory(history::performance_history(table))
    }
    ReportKind::EmployeeTenure => ReportRows::EmployeeTenure(tenure::employee_tenure(table, ctx)),
    ReportKind::SalaryBands => ReportRows::SalaryBands(salary::salary_bands()),
    ReportKind::SalaryBandDistribution => {
      ReportRows::SalaryBandDistribution(salary::salary_band_distribution(table))
    }
    ReportKind::DepartmentAnomalies => {
      ReportRows::DepartmentAnomalies(department::department_anomalies(table))
    }
    ReportKind::CohortAnalysis => ReportRows::CohortAnalysis(history::cohort_analysis(table)),
    ReportKind::TurnoverRisk => ReportRows::TurnoverRisk(risk::turnover_risk(table)),
    ReportKind::FeedbackSummary => ReportRows::FeedbackSummary(feedback::feedback_summary(table)),
    ReportKind::TopPerformers => ReportRows::TopPerformers(feedback::top_performers(table, ctx)),
    ReportKind::DepartmentFeedback => {
      ReportRows::DepartmentFeedback(department::department_feedback(table))
    }
    ReportKind::SatisfactionFeedbackCorrelation => ReportRows::SatisfactionFeedbackCorrelation(
      correlation::satisfaction_feedback_correlation(table, ctx),
    ),
    ReportKind::SatisfactionFeedbackInsights => ReportRows::SatisfactionFeedbackInsights(
      correlation::satisfaction_feedback_insights(table, ctx),
    ),
    ReportKind::ProductivitySalaryCorrelation => ReportRows::ProductivitySalaryCorrelation(
      correlation::productivity_salary_correlation(table, ctx),
    ),
    ReportKind::ProductivitySalaryInsights => ReportRows::ProductivitySalaryInsights(
      correlation::productivity_salary_insights(table, ctx),
    ),
  };
  tracing::debug!(report = %kind, rows = rows.len(), "report computed");
  rows
}

/// Group rows by department; iteration order is by department name.
pub(crate) fn by_department(rows: &[Employee]) -> BTreeMap<&str, Vec<&Employee>> {
  let mut groups: BTreeMap<&str, Vec<&Employee>> = BTreeMap::new();
  for e in rows {
    groups.entry(e.department.as_str()).or_default().push(e);
  }
  groups
}

// ─── Test fixtures ───────────────────────────────────────────────────────────
