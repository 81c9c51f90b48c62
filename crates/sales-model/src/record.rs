use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `strftime`-style format used for `sale_date` in the store.
///
/// SQLite compares dates as text, so the stored form must sort chronologically
/// and compare cleanly against literals such as `'2024-12-31'`.
pub const SALE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("quantity must be non-negative (got {0})")]
    NegativeQuantity(i64),
    #[error("sales must be a non-negative finite number (got {0})")]
    InvalidSales(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sale_date: NaiveDate,
    pub channel: String,
    pub product_name: String,
    pub city: String,
    pub quantity: i64,
    pub sales: f64,
}

/// Borrowed view of the fields used to detect duplicate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NaturalKey<'a> {
    pub sale_date: NaiveDate,
    pub product_name: &'a str,
    pub city: &'a str,
}

impl SaleRecord {
    pub fn new(
        sale_date: NaiveDate,
        channel: impl Into<String>,
        product_name: impl Into<String>,
        city: impl Into<String>,
        quantity: i64,
        sales: f64,
    ) -> Result<Self, RecordError> {
        if quantity < 0 {
            return Err(RecordError::NegativeQuantity(quantity));
        }
        if !sales.is_finite() || sales < 0.0 {
            return Err(RecordError::InvalidSales(sales));
        }

        Ok(Self {
            sale_date,
            channel: channel.into(),
            product_name: product_name.into(),
            city: city.into(),
            quantity,
            sales,
        })
    }

    pub fn natural_key(&self) -> NaturalKey<'_> {
        NaturalKey {
            sale_date: self.sale_date,
            product_name: &self.product_name,
            city: &self.city,
        }
    }

    /// The `sale_date` as persisted (`YYYY-MM-DD`).
    pub fn sale_date_text(&self) -> String {
        self.sale_date.format(SALE_DATE_FORMAT).to_string()
    }
}

impl NaturalKey<'_> {
    pub fn sale_date_text(&self) -> String {
        self.sale_date.format(SALE_DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for NaturalKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} in {}",
            self.sale_date.format(SALE_DATE_FORMAT),
            self.product_name,
            self.city
        )
    }
}
