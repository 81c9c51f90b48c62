use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use sales_model::SaleRecord;

use crate::cell::RawCell;
use crate::columns::decode_rows;
use crate::{ImportError, Result};

/// Read records from the first sheet of the workbook at `path`.
pub(crate) fn read_first_sheet(path: &Path) -> Result<(String, Vec<SaleRecord>)> {
    let mut workbook = open_workbook_auto(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::NoSheets(path.to_path_buf()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| ImportError::Sheet {
            sheet: sheet_name.clone(),
            source,
        })?;

    // calamine row iterators are relative to `range.start()`; report absolute 1-based rows.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0) + 1;
    let rows = range.rows().enumerate().map(|(offset, row)| {
        let cells = row.iter().map(RawCell::from_data).collect::<Vec<_>>();
        (first_row + offset, cells)
    });

    let records = decode_rows(rows)?;
    Ok((sheet_name, records))
}
