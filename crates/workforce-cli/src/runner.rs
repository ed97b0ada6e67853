//! Fan reports out over blocking worker threads.
//!
//! Every report gets its own task over a shared, immutable snapshot. A report
//! that panics is recorded as failed; the others still complete. Results come
//! back in the order the reports were requested.

use std::sync::Arc;

use serde::Serialize;
use workforce_core::{FactTable, ReportContext, ReportKind, ReportRows, report};

/// Outcome of a single report in the JSON output.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReportOutput {
  Rows(ReportRows),
  Failed { report: &'static str, error: String },
}

impl ReportOutput {
  pub fn is_failed(&self) -> bool { matches!(self, Self::Failed { .. }) }
}

pub async fn run_reports(
  table: Arc<FactTable>,
  ctx: Arc<ReportContext>,
  kinds: &[ReportKind],
) -> Vec<ReportOutput> {
  let handles: Vec<_> = kinds
    .iter()
    .map(|&kind| {
      let table = Arc::clone(&table);
      let ctx = Arc::clone(&ctx);
      let handle = tokio::task::spawn_blocking(move || {
        let _span = tracing::debug_span!("report", %kind).entered();
        report::run(kind, &table, &ctx)
      });
      (kind, handle)
    })
    .collect();

  let mut outputs = Vec::with_capacity(handles.len());
  for (kind, handle) in handles {
    match handle.await {
      Ok(rows) => {
        tracing::info!(report = %kind, rows = rows.len(), "report finished");
        outputs.push(ReportOutput::Rows(rows));
      }
      Err(e) => {
        tracing::warn!(report = %kind, error = %e, "report failed");
        outputs.push(ReportOutput::Failed { report: kind.as_str(), error: e.to_string() });
      }
    }
  }
  outputs
}
