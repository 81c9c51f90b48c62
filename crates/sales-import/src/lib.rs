//! Sales spreadsheet import.
//!
//! Reads the first sheet of a workbook (anything calamine can open) or a CSV
//! file into [`SaleRecord`]s. The first non-empty row is the header; columns
//! are located by name so their order in the file does not matter.
//!
//! Any problem with the file is reported as an [`ImportError`]. Import is
//! all-or-nothing: a single bad cell rejects the whole file, so callers never
//! load a partial batch.

use std::path::{Path, PathBuf};

use sales_model::{RecordError, SaleRecord};
use thiserror::Error;

mod cell;
mod columns;
mod delimited;
mod workbook;

pub use columns::Column;
pub use delimited::read_sales_csv;

/// Number of records echoed to the debug log after a successful read.
const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated text.
    Csv,
    /// Any workbook format calamine auto-detects (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`).
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SourceFormat::Csv,
            _ => SourceFormat::Workbook,
        }
    }
}

#[derive(Debug)]
pub struct SalesImport {
    pub source: PathBuf,
    pub format: SourceFormat,
    /// Sheet the records were read from (`None` for CSV input).
    pub sheet_name: Option<String>,
    pub records: Vec<SaleRecord>,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open workbook `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("workbook `{0}` contains no sheets")]
    NoSheets(PathBuf),
    #[error("failed to read sheet `{sheet}`: {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("no header row found")]
    MissingHeader,
    #[error("required column `{0}` not found in header row")]
    MissingColumn(&'static str),
    #[error("row {row}, column `{column}`: {message}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        message: String,
    },
    #[error("row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: RecordError,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Read sales records from `path`, choosing the reader from the file extension.
pub fn read_sales_path(path: impl AsRef<Path>) -> Result<SalesImport> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path);

    let (sheet_name, records) = match format {
        SourceFormat::Csv => {
            let file = std::fs::File::open(path).map_err(|source| ImportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            (None, read_sales_csv(std::io::BufReader::new(file))?)
        }
        SourceFormat::Workbook => {
            let (sheet, records) = workbook::read_first_sheet(path)?;
            (Some(sheet), records)
        }
    };

    log::info!(
        "loaded {} sales records from `{}`",
        records.len(),
        path.display()
    );
    for record in records.iter().take(PREVIEW_ROWS) {
        log::debug!(
            "{} | {} | {} | {} | {} | {}",
            record.sale_date_text(),
            record.channel,
            record.product_name,
            record.city,
            record.quantity,
            record.sales
        );
    }

    Ok(SalesImport {
        source: path.to_path_buf(),
        format,
        sheet_name,
        records,
    })
}
