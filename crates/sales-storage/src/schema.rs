use rusqlite::Connection;

pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    // No uniqueness constraint: the loader enforces the natural key.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sales_data (
          sale_date TEXT NOT NULL,     -- YYYY-MM-DD
          channel TEXT NOT NULL,
          product_name TEXT NOT NULL,
          city TEXT NOT NULL,
          quantity INTEGER NOT NULL,
          sales REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sales_data_natural_key
          ON sales_data(sale_date, product_name, city);
        "#,
    )
}
