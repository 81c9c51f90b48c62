use std::io::Read;

use sales_model::SaleRecord;

use crate::cell::RawCell;
use crate::columns::decode_rows;
use crate::Result;

/// Read records from CSV text. The first non-empty record is the header.
pub fn read_sales_csv<R: Read>(reader: R) -> Result<Vec<SaleRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for record in csv_reader.records() {
        records.push(record?);
    }

    // The csv reader skips blank lines, so take row numbers from record positions.
    let rows = records.iter().enumerate().map(|(idx, record)| {
        let row = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 1);
        (row, record.iter().map(RawCell::from_text).collect::<Vec<_>>())
    });
    decode_rows(rows)
}
