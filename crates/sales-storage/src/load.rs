use rusqlite::{params, Connection};
use sales_model::{NaturalKey, SaleRecord};

const EXISTS_SQL: &str = "SELECT COUNT(*) FROM sales_data \
     WHERE sale_date = ?1 AND product_name = ?2 AND city = ?3";

const INSERT_SQL: &str = "INSERT INTO sales_data \
     (sale_date, channel, product_name, city, quantity, sales) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

/// How the loader decides which incoming records are already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupStrategy {
    /// One existence query per record, in source order.
    #[default]
    PointQuery,
    /// Stage the batch in a temp table and insert the unmatched keys with a single anti-join.
    AntiJoin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub dedup: DedupStrategy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub read: usize,
    pub inserted: usize,
    pub skipped: usize,
}

pub(crate) fn key_exists(conn: &Connection, key: &NaturalKey<'_>) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare_cached(EXISTS_SQL)?;
    let count: i64 = stmt.query_row(
        params![key.sale_date_text(), key.product_name, key.city],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

pub(crate) fn insert_record(conn: &Connection, record: &SaleRecord) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(INSERT_SQL)?;
    stmt.execute(params![
        record.sale_date_text(),
        &record.channel,
        &record.product_name,
        &record.city,
        record.quantity,
        record.sales,
    ])?;
    Ok(())
}

/// Caller owns the surrounding transaction.
pub(crate) fn load_records(
    conn: &Connection,
    records: &[SaleRecord],
    options: &LoadOptions,
) -> crate::Result<LoadSummary> {
    let inserted = match options.dedup {
        DedupStrategy::PointQuery => load_point_query(conn, records)?,
        DedupStrategy::AntiJoin => load_anti_join(conn, records)?,
    };

    Ok(LoadSummary {
        read: records.len(),
        inserted,
        skipped: records.len() - inserted,
    })
}

fn load_point_query(conn: &Connection, records: &[SaleRecord]) -> rusqlite::Result<usize> {
    let mut inserted = 0;
    for record in records {
        let key = record.natural_key();
        // Runs inside the load transaction, so rows inserted earlier in this batch are seen.
        if key_exists(conn, &key)? {
            log::info!("data for {key} already exists");
            continue;
        }
        insert_record(conn, record)?;
        log::debug!("inserted {key} ({})", record.channel);
        inserted += 1;
    }
    Ok(inserted)
}

fn load_anti_join(conn: &Connection, records: &[SaleRecord]) -> rusqlite::Result<usize> {
    conn.execute_batch(
        r#"
        CREATE TEMP TABLE IF NOT EXISTS sales_staging (
          seq INTEGER PRIMARY KEY,
          sale_date TEXT NOT NULL,
          channel TEXT NOT NULL,
          product_name TEXT NOT NULL,
          city TEXT NOT NULL,
          quantity INTEGER NOT NULL,
          sales REAL NOT NULL
        );
        DELETE FROM temp.sales_staging;
        "#,
    )?;

    {
        let mut stage = conn.prepare(
            "INSERT INTO temp.sales_staging \
             (seq, sale_date, channel, product_name, city, quantity, sales) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (seq, record) in records.iter().enumerate() {
            stage.execute(params![
                seq as i64,
                record.sale_date_text(),
                &record.channel,
                &record.product_name,
                &record.city,
                record.quantity,
                record.sales,
            ])?;
        }
    }

    // First occurrence (by source position) of every staged key that has no stored match.
    let inserted = conn.execute(
        r#"
        INSERT INTO sales_data (sale_date, channel, product_name, city, quantity, sales)
        SELECT s.sale_date, s.channel, s.product_name, s.city, s.quantity, s.sales
        FROM temp.sales_staging AS s
        WHERE s.seq = (
            SELECT MIN(f.seq) FROM temp.sales_staging AS f
            WHERE f.sale_date = s.sale_date AND f.product_name = s.product_name AND f.city = s.city
          )
          AND NOT EXISTS (
            SELECT 1 FROM main.sales_data AS d
            WHERE d.sale_date = s.sale_date AND d.product_name = s.product_name AND d.city = s.city
          )
        ORDER BY s.seq
        "#,
        params![],
    )?;

    conn.execute_batch("DROP TABLE temp.sales_staging")?;

    if inserted < records.len() {
        log::info!(
            "{} incoming records matched existing natural keys and were skipped",
            records.len() - inserted
        );
    }
    Ok(inserted)
}
