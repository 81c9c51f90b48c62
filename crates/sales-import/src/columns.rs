use sales_model::SaleRecord;

use crate::cell::RawCell;
use crate::{ImportError, Result};

/// Columns the source file must provide, identified by their header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Channel,
    ProductName,
    City,
    Quantity,
    Sales,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Date,
        Column::Channel,
        Column::ProductName,
        Column::City,
        Column::Quantity,
        Column::Sales,
    ];

    pub const fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Channel => "Channel",
            Column::ProductName => "Product Name",
            Column::City => "City",
            Column::Quantity => "Quantity",
            Column::Sales => "Sales",
        }
    }
}

/// Position of every required column within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    indices: [usize; 6],
}

impl ColumnMap {
    pub(crate) fn from_header(cells: &[RawCell<'_>]) -> Result<Self> {
        let mut indices = [0usize; 6];
        for (slot, column) in indices.iter_mut().zip(Column::ALL) {
            *slot = cells
                .iter()
                .position(|cell| cell.header_text() == Some(column.header()))
                .ok_or(ImportError::MissingColumn(column.header()))?;
        }
        Ok(Self { indices })
    }

    /// Decode one data row. Returns `Ok(None)` for a row with no values at all.
    ///
    /// `row` is the 1-based row number in the source file, used for error messages.
    pub(crate) fn decode(&self, row: usize, cells: &[RawCell<'_>]) -> Result<Option<SaleRecord>> {
        if cells.iter().all(RawCell::is_empty) {
            log::debug!("skipping blank row {row}");
            return Ok(None);
        }

        let cell = |column: Column| cell_at(cells, self.indices[column as usize]);
        let invalid = |column: Column| {
            move |message: String| ImportError::InvalidCell {
                row,
                column: column.header(),
                message,
            }
        };

        let sale_date = cell(Column::Date)
            .to_date()
            .map_err(invalid(Column::Date))?;
        let channel = cell(Column::Channel)
            .to_text()
            .map_err(invalid(Column::Channel))?;
        let product_name = cell(Column::ProductName)
            .to_text()
            .map_err(invalid(Column::ProductName))?;
        let city = cell(Column::City).to_text().map_err(invalid(Column::City))?;
        let quantity = cell(Column::Quantity)
            .to_quantity()
            .map_err(invalid(Column::Quantity))?;
        let sales = cell(Column::Sales)
            .to_amount()
            .map_err(invalid(Column::Sales))?;

        SaleRecord::new(sale_date, channel, product_name, city, quantity, sales)
            .map(Some)
            .map_err(|source| ImportError::InvalidRecord { row, source })
    }
}

fn cell_at<'a>(cells: &[RawCell<'a>], idx: usize) -> RawCell<'a> {
    cells.get(idx).cloned().unwrap_or(RawCell::Empty)
}

/// Find the header among `rows` and decode every row after it.
///
/// Each item pairs the 1-based source row number with that row's cells.
pub(crate) fn decode_rows<'a, I>(rows: I) -> Result<Vec<SaleRecord>>
where
    I: IntoIterator<Item = (usize, Vec<RawCell<'a>>)>,
{
    let mut map: Option<ColumnMap> = None;
    let mut records = Vec::new();

    for (row, cells) in rows {
        match &map {
            None => {
                if cells.iter().all(RawCell::is_empty) {
                    continue;
                }
                map = Some(ColumnMap::from_header(&cells)?);
            }
            Some(map) => {
                if let Some(record) = map.decode(row, &cells)? {
                    records.push(record);
                }
            }
        }
    }

    if map.is_none() {
        return Err(ImportError::MissingHeader);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&'static str]) -> Vec<RawCell<'static>> {
        values.iter().copied().map(RawCell::from_text).collect()
    }

    fn numbered(rows: Vec<Vec<RawCell<'static>>>) -> Vec<(usize, Vec<RawCell<'static>>)> {
        rows.into_iter().enumerate().map(|(i, row)| (i + 1, row)).collect()
    }

    #[test]
    fn header_order_is_free_and_extra_columns_are_ignored() {
        let header = texts(&["Sales", "Notes", "City", "Date", "Quantity", "Product Name", "Channel"]);
        let map = ColumnMap::from_header(&header).unwrap();
        let row = texts(&["12.5", "x", "City1", "2024-10-01", "2", "Product 1", "Channel 1"]);
        let record = map.decode(2, &row).unwrap().unwrap();
        assert_eq!(record.city, "City1");
        assert_eq!(record.channel, "Channel 1");
        assert_eq!(record.quantity, 2);
        assert_eq!(record.sales, 12.5);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let header = texts(&["Date", "Channel", "Product Name", "City", "Quantity"]);
        assert!(matches!(
            ColumnMap::from_header(&header),
            Err(ImportError::MissingColumn("Sales"))
        ));
    }

    #[test]
    fn invalid_cell_reports_row_and_column() {
        let rows = numbered(vec![
            texts(&["Date", "Channel", "Product Name", "City", "Quantity", "Sales"]),
            texts(&["2024-10-01", "Channel 1", "Product 1", "City1", "two", "1"]),
        ]);
        match decode_rows(rows) {
            Err(ImportError::InvalidCell { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Quantity");
            }
            other => panic!("expected invalid cell, got {other:?}"),
        }
    }

    #[test]
    fn negative_quantity_is_an_invalid_record() {
        let rows = numbered(vec![
            texts(&["Date", "Channel", "Product Name", "City", "Quantity", "Sales"]),
            texts(&["2024-10-01", "Channel 1", "Product 1", "City1", "-2", "1"]),
        ]);
        assert!(matches!(
            decode_rows(rows),
            Err(ImportError::InvalidRecord { row: 2, .. })
        ));
    }

    #[test]
    fn leading_and_interior_blank_rows_are_skipped() {
        let rows = numbered(vec![
            texts(&["", ""]),
            texts(&["Date", "Channel", "Product Name", "City", "Quantity", "Sales"]),
            texts(&["", "", "", "", "", ""]),
            texts(&["2024-10-01", "Channel 1", "Product 1", "City1", "2", "10"]),
        ]);
        let records = decode_rows(rows).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(
            decode_rows(Vec::<(usize, Vec<RawCell<'static>>)>::new()),
            Err(ImportError::MissingHeader)
        ));
    }
}
