//! Core data model for sales records.
//!
//! A [`SaleRecord`] is one row of the source spreadsheet. Records are
//! deduplicated on their [`NaturalKey`] (`sale_date`, `product_name`, `city`);
//! the channel is not part of the key.

pub mod date;
mod record;

pub use record::{NaturalKey, RecordError, SaleRecord, SALE_DATE_FORMAT};
