use std::io::{self, Write};

use sales_storage::{ResultSet, Value};
use serde::Serialize;

use crate::driver::{ReportOutcome, ReportResult};

pub const NO_DATA_NOTICE: &str = "No data found for the query.";

/// Render each report as `Query: <name>` followed by an aligned table.
pub fn render_text<W: Write>(out: &mut W, outcomes: &[ReportOutcome]) -> io::Result<()> {
    for outcome in outcomes {
        writeln!(out)?;
        writeln!(out, "Query: {}", outcome.name)?;
        match &outcome.result {
            ReportResult::Rows(rows) => write_table(out, rows)?,
            ReportResult::Empty => writeln!(out, "{NO_DATA_NOTICE}")?,
            ReportResult::Failed(err) => writeln!(out, "Query failed: {err}")?,
        }
    }
    out.flush()
}

fn write_table<W: Write>(out: &mut W, rows: &ResultSet) -> io::Result<()> {
    let cells: Vec<Vec<String>> = rows
        .rows
        .iter()
        .map(|row| row.iter().map(display_value).collect())
        .collect();

    let widths: Vec<usize> = rows
        .columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    // Numeric columns are right-aligned, as are their headers.
    let numeric: Vec<bool> = (0..rows.columns.len())
        .map(|col| {
            rows.rows.iter().all(|row| {
                matches!(
                    row.get(col),
                    Some(Value::Integer(_) | Value::Real(_) | Value::Null) | None
                )
            })
        })
        .collect();

    let header: Vec<String> = rows.columns.clone();
    write_row(out, &header, &widths, &numeric)?;
    for row in &cells {
        write_row(out, row, &widths, &numeric)?;
    }
    Ok(())
}

fn write_row<W: Write>(
    out: &mut W,
    row: &[String],
    widths: &[usize],
    numeric: &[bool],
) -> io::Result<()> {
    let mut line = String::new();
    for (col, cell) in row.iter().enumerate() {
        if col > 0 {
            line.push_str("  ");
        }
        let width = widths.get(col).copied().unwrap_or(0);
        if numeric.get(col).copied().unwrap_or(false) {
            line.push_str(&format!("{cell:>width$}"));
        } else {
            line.push_str(&format!("{cell:<width$}"));
        }
    }
    writeln!(out, "{}", line.trim_end())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(v) => v.to_string(),
        // `{:?}` keeps a trailing `.0` so real-valued columns read as such.
        Value::Real(v) => format!("{v:?}"),
        Value::Text(s) => s.clone(),
        Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    reports: Vec<JsonReport<'a>>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    name: &'a str,
    status: &'static str,
    columns: &'a [String],
    rows: Vec<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Render all reports as a single JSON document followed by a newline.
pub fn render_json<W: Write>(out: &mut W, outcomes: &[ReportOutcome]) -> io::Result<()> {
    let reports = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            ReportResult::Rows(rows) => JsonReport {
                name: &outcome.name,
                status: "ok",
                columns: &rows.columns,
                rows: rows
                    .rows
                    .iter()
                    .map(|row| row.iter().map(json_value).collect())
                    .collect(),
                error: None,
            },
            ReportResult::Empty => JsonReport {
                name: &outcome.name,
                status: "empty",
                columns: &[],
                rows: Vec::new(),
                error: None,
            },
            ReportResult::Failed(err) => JsonReport {
                name: &outcome.name,
                status: "failed",
                columns: &[],
                rows: Vec::new(),
                error: Some(err),
            },
        })
        .collect();

    serde_json::to_writer(&mut *out, &JsonDocument { reports })?;
    out.write_all(b"\n")?;
    out.flush()
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(v) => serde_json::Value::from(*v),
        // Non-finite reals have no JSON form and become `null`.
        Value::Real(v) => serde_json::Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Blob(bytes) => serde_json::Value::from(bytes.clone()),
    }
}
