use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Connection;
use sales_model::SALE_DATE_FORMAT;

use crate::storage::{Result, StorageError};

/// Named parameter a report query may use for its reference date.
pub const AS_OF_PARAM: &str = ":as_of";

/// Values bound into report queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Reference date for relative windows ("last 6 months"). `None` means SQLite's `'now'`.
    pub as_of: Option<NaiveDate>,
}

impl QueryParams {
    pub fn as_of(date: NaiveDate) -> Self {
        Self { as_of: Some(date) }
    }

    fn as_of_text(&self) -> String {
        match self.as_of {
            Some(date) => date.format(SALE_DATE_FORMAT).to_string(),
            None => "now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }
}

pub(crate) fn run(conn: &Connection, sql: &str, params: &QueryParams) -> Result<ResultSet> {
    let mut stmt = conn.prepare(sql)?;
    if !stmt.readonly() {
        return Err(StorageError::NotReadOnly);
    }

    for idx in 1..=stmt.parameter_count() {
        let name = stmt.parameter_name(idx).map(str::to_owned);
        match name.as_deref() {
            Some(AS_OF_PARAM) => stmt.raw_bind_parameter(idx, params.as_of_text())?,
            Some(name) => return Err(StorageError::UnsupportedParameter(name.to_string())),
            None => return Err(StorageError::UnsupportedParameter(format!("?{idx}"))),
        }
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.raw_query();
    while let Some(row) = cursor.next()? {
        let mut values = Vec::with_capacity(width);
        for idx in 0..width {
            values.push(row.get::<_, Value>(idx)?);
        }
        rows.push(values);
    }

    Ok(ResultSet { columns, rows })
}
