use sales_storage::{QueryParams, ResultSet, Store, Value};

use crate::catalog::ReportCatalog;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportResult {
    Rows(ResultSet),
    /// The query ran but matched nothing.
    Empty,
    /// The query could not be run; holds the storage error message.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    pub name: String,
    pub result: ReportResult,
}

/// Run every report in catalog order. A failing report never stops the ones after it.
pub fn run_reports(store: &Store, catalog: &ReportCatalog, params: &QueryParams) -> Vec<ReportOutcome> {
    catalog
        .reports()
        .iter()
        .map(|report| {
            let result = match store.query(&report.sql, params) {
                Ok(rows) if carries_no_data(&rows) => ReportResult::Empty,
                Ok(rows) => ReportResult::Rows(rows),
                Err(err) => {
                    log::warn!("report `{}` failed: {err}", report.name);
                    ReportResult::Failed(err.to_string())
                }
            };
            ReportOutcome {
                name: report.name.clone(),
                result,
            }
        })
        .collect()
}

/// No rows, or only rows of NULLs (an aggregate such as `AVG` over zero rows).
fn carries_no_data(rows: &ResultSet) -> bool {
    rows.rows
        .iter()
        .all(|row| row.iter().all(|value| matches!(value, Value::Null)))
}
