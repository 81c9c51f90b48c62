//! SQLite-backed store for sales records.
//!
//! Exposes:
//! - schema creation for the single append-only `sales_data` table
//! - the natural-key existence check
//! - a deduplicating, single-transaction loader
//! - a read-only query runner used by the report driver

mod load;
mod query;
mod schema;
pub mod storage;

pub use load::{DedupStrategy, LoadOptions, LoadSummary};
pub use query::{QueryParams, ResultSet, AS_OF_PARAM};
pub use rusqlite::types::Value;
pub use storage::{Result, Store, StorageError};
