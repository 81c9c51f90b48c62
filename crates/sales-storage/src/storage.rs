use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags};
use sales_model::{NaturalKey, SaleRecord};
use thiserror::Error;

use crate::load::{self, LoadOptions, LoadSummary};
use crate::query::{self, QueryParams, ResultSet};
use crate::schema;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open store `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("query is not read-only")]
    NotReadOnly,
    #[error("unsupported query parameter `{0}` (only `:as_of` can be bound)")]
    UnsupportedParameter(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A sales store backed by one SQLite connection, held for the store's lifetime.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn open_uri(uri: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI;
        let conn = Connection::open_with_flags(uri, flags).map_err(|source| StorageError::Open {
            path: PathBuf::from(uri),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::init(&conn)?;
        Ok(Self { conn })
    }

    /// Whether a row with the same `(sale_date, product_name, city)` is already persisted.
    ///
    /// Matching is exact text equality on all three fields; the channel is not consulted.
    pub fn exists(&self, key: &NaturalKey<'_>) -> Result<bool> {
        Ok(load::key_exists(&self.conn, key)?)
    }

    /// Persist every record whose natural key is not yet stored.
    ///
    /// The whole pass runs in one transaction: on error nothing from `records` is kept.
    pub fn load(&mut self, records: &[SaleRecord], options: &LoadOptions) -> Result<LoadSummary> {
        let tx = self.conn.transaction()?;
        let summary = load::load_records(&tx, records, options)?;
        tx.commit()?;

        log::info!(
            "sales load complete: read={} inserted={} skipped={}",
            summary.read,
            summary.inserted,
            summary.skipped
        );
        Ok(summary)
    }

    pub fn row_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sales_data", params![], |r| r.get(0))?;
        Ok(count as u64)
    }

    /// Run a trusted, read-only SQL statement and collect its rows.
    pub fn query(&self, sql: &str, params: &QueryParams) -> Result<ResultSet> {
        query::run(&self.conn, sql, params)
    }
}
