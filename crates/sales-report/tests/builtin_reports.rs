use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_model::SaleRecord;
use sales_report::{run_reports, ReportCatalog, ReportOutcome, ReportResult};
use sales_storage::{LoadOptions, QueryParams, ResultSet, Store, Value};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn fixture() -> Vec<SaleRecord> {
    [
        ("2024-03-15", "Channel 1", "Product 1", "City1", 5, 50.0),
        ("2024-10-05", "Channel 1", "Product 2", "City1", 2, 30.0),
        ("2024-10-20", "Channel 2", "Product 1", "City2", 10, 100.0),
        ("2024-12-31", "Channel 1", "Product 3", "City3", 1, 200.0),
        ("2025-01-10", "Platform1", "Product 2", "City2", 4, 60.0),
        ("2025-01-25", "Platform1", "Product 1", "City1", 6, 36.0),
        ("2025-02-14", "Channel 1", "Product 2", "City3", 3, 45.0),
        ("2025-03-01", "Platform2", "Product 1", "City2", 2, 24.0),
    ]
    .into_iter()
    .map(|(date, channel, product, city, qty, sales)| {
        SaleRecord::new(day(date), channel, product, city, qty, sales).expect("valid record")
    })
    .collect()
}

fn seeded_store() -> Store {
    let mut store = Store::open_in_memory().expect("open store");
    store.load(&fixture(), &LoadOptions::default()).expect("seed store");
    store
}

fn run_builtin(store: &Store) -> Vec<ReportOutcome> {
    run_reports(store, &ReportCatalog::builtin(), &QueryParams::as_of(day("2025-03-15")))
}

fn rows_of<'a>(outcomes: &'a [ReportOutcome], name: &str) -> &'a ResultSet {
    let outcome = outcomes
        .iter()
        .find(|o| o.name == name)
        .unwrap_or_else(|| panic!("report `{name}` missing"));
    match &outcome.result {
        ReportResult::Rows(rows) => rows,
        other => panic!("report `{name}` returned {other:?}"),
    }
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn sorted(rows: &ResultSet) -> Vec<Vec<Value>> {
    let mut rows = rows.rows.clone();
    rows.sort_by(|a, b| format!("{a:?}").cmp(&format!("{b:?}")));
    rows
}

#[test]
fn reports_run_in_catalog_order() {
    let store = seeded_store();
    let outcomes = run_builtin(&store);
    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    let catalog = ReportCatalog::builtin();
    let expected: Vec<&str> = catalog
        .reports()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, expected);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o.result, ReportResult::Rows(_))));
}

#[test]
fn per_city_totals() {
    let outcomes = run_builtin(&seeded_store());
    let rows = rows_of(&outcomes, "Show total sales and quantity per city");
    assert_eq!(rows.columns, ["City", "Total_Sales", "Total_Quantity"]);
    assert_eq!(
        sorted(rows),
        vec![
            vec![text("City1"), Value::Real(116.0), Value::Integer(13)],
            vec![text("City2"), Value::Real(184.0), Value::Integer(16)],
            vec![text("City3"), Value::Real(245.0), Value::Integer(4)],
        ]
    );
}

#[test]
fn highest_sales_city_includes_last_day_of_year() {
    let outcomes = run_builtin(&seeded_store());
    let rows = rows_of(&outcomes, "Which city had the highest sales in 2024");
    assert_eq!(rows.rows, vec![vec![text("City3"), Value::Real(200.0)]]);
}

#[test]
fn monthly_product_and_channel_sales() {
    let outcomes = run_builtin(&seeded_store());

    let rows = rows_of(&outcomes, "Get monthly sales for Product 2 in 2025");
    assert_eq!(
        rows.rows,
        vec![
            vec![text("2025-01"), Value::Real(60.0)],
            vec![text("2025-02"), Value::Real(45.0)],
        ]
    );

    let rows = rows_of(&outcomes, "Compare sales in January and February 2025");
    assert_eq!(
        rows.rows,
        vec![
            vec![text("2025-01"), Value::Real(96.0)],
            vec![text("2025-02"), Value::Real(45.0)],
        ]
    );

    let rows = rows_of(&outcomes, "What are the monthly sales across platform1 since Jan 2025?");
    assert_eq!(rows.rows, vec![vec![text("2025-01"), Value::Real(96.0)]]);
}

#[test]
fn quantity_rankings() {
    let outcomes = run_builtin(&seeded_store());

    let rows = rows_of(&outcomes, "Show top 3 cities by total quantity sold");
    assert_eq!(
        rows.rows,
        vec![
            vec![text("City2"), Value::Integer(16)],
            vec![text("City1"), Value::Integer(13)],
            vec![text("City3"), Value::Integer(4)],
        ]
    );

    let rows = rows_of(
        &outcomes,
        "Can you tell me the top 5 days with the highest daily units sold?",
    );
    assert_eq!(
        rows.rows,
        vec![
            vec![text("2024-10-20"), Value::Integer(10)],
            vec![text("2025-01-25"), Value::Integer(6)],
            vec![text("2024-03-15"), Value::Integer(5)],
            vec![text("2025-01-10"), Value::Integer(4)],
            vec![text("2025-02-14"), Value::Integer(3)],
        ]
    );
}

#[test]
fn product_totals_and_average() {
    let outcomes = run_builtin(&seeded_store());

    let rows = rows_of(&outcomes, "List product names with their total sales");
    assert_eq!(
        sorted(rows),
        vec![
            vec![text("Product 1"), Value::Real(210.0)],
            vec![text("Product 2"), Value::Real(135.0)],
            vec![text("Product 3"), Value::Real(200.0)],
        ]
    );

    let rows = rows_of(&outcomes, "What is the average sales per transaction for Product 2");
    assert_eq!(rows.rows, vec![vec![Value::Real(45.0)]]);
}

#[test]
fn trailing_six_months_follows_as_of() {
    let outcomes = run_builtin(&seeded_store());
    let rows = rows_of(
        &outcomes,
        "Find total quantity sold for each channel in the last 6 months",
    );
    assert_eq!(rows.columns, ["Channel", "SUM(Quantity)"]);
    assert_eq!(
        sorted(rows),
        vec![
            vec![text("Channel 1"), Value::Integer(6)],
            vec![text("Channel 2"), Value::Integer(10)],
            vec![text("Platform1"), Value::Integer(10)],
            vec![text("Platform2"), Value::Integer(2)],
        ]
    );

    // Moving the reference date forward narrows the window to the last row.
    let later = run_reports(
        &seeded_store(),
        &ReportCatalog::builtin(),
        &QueryParams::as_of(day("2025-08-20")),
    );
    let rows = rows_of(
        &later,
        "Find total quantity sold for each channel in the last 6 months",
    );
    assert_eq!(rows.rows, vec![vec![text("Platform2"), Value::Integer(2)]]);
}

#[test]
fn city_rank_by_sales() {
    let outcomes = run_builtin(&seeded_store());
    let rows = rows_of(&outcomes, "Rank cities based on total sales");
    assert_eq!(
        rows.rows,
        vec![
            vec![text("City3"), Value::Real(245.0), Value::Integer(1)],
            vec![text("City2"), Value::Real(184.0), Value::Integer(2)],
            vec![text("City1"), Value::Real(116.0), Value::Integer(3)],
        ]
    );
}

#[test]
fn city_rank_ties_share_a_rank_without_gaps() {
    let mut store = Store::open_in_memory().expect("open store");
    let records: Vec<SaleRecord> = [("CityA", 10.0), ("CityB", 10.0), ("CityC", 5.0)]
        .into_iter()
        .map(|(city, sales)| {
            SaleRecord::new(day("2024-05-01"), "Channel 1", "Product 1", city, 1, sales).unwrap()
        })
        .collect();
    store.load(&records, &LoadOptions::default()).expect("seed");

    let outcomes = run_builtin(&store);
    let rows = rows_of(&outcomes, "Rank cities based on total sales");
    let ranks: Vec<&Value> = rows.rows.iter().map(|r| &r[2]).collect();
    assert_eq!(
        ranks,
        [&Value::Integer(1), &Value::Integer(1), &Value::Integer(2)]
    );
}

#[test]
fn city_channel_month_rows() {
    let outcomes = run_builtin(&seeded_store());
    let rows = rows_of(&outcomes, "Get sales in City1 for Channel 1 in October 2024");
    assert_eq!(
        rows.columns,
        ["sale_date", "channel", "product_name", "city", "quantity", "sales"]
    );
    assert_eq!(
        rows.rows,
        vec![vec![
            text("2024-10-05"),
            text("Channel 1"),
            text("Product 2"),
            text("City1"),
            Value::Integer(2),
            Value::Real(30.0),
        ]]
    );
}

#[test]
fn channel_share_of_units_since_2025() {
    let outcomes = run_builtin(&seeded_store());
    let rows = rows_of(
        &outcomes,
        "What is the share of units sold across various platforms since Jan 2025?",
    );
    let share = rows.column_index("Share_Percent").expect("share column");

    let mut shares: Vec<(String, i64, f64)> = rows
        .rows
        .iter()
        .map(|row| match (&row[0], &row[1], &row[share]) {
            (Value::Text(channel), Value::Integer(qty), Value::Real(pct)) => {
                (channel.clone(), *qty, *pct)
            }
            other => panic!("unexpected row {other:?}"),
        })
        .collect();
    shares.sort_by(|a, b| a.0.cmp(&b.0));

    let expected = [
        ("Channel 1", 3, 20.0),
        ("Platform1", 10, 200.0 / 3.0),
        ("Platform2", 2, 40.0 / 3.0),
    ];
    assert_eq!(shares.len(), expected.len());
    for ((channel, qty, pct), (want_channel, want_qty, want_pct)) in shares.iter().zip(expected) {
        assert_eq!(channel, want_channel);
        assert_eq!(*qty, want_qty);
        assert!((pct - want_pct).abs() < 1e-9, "{channel}: {pct} != {want_pct}");
    }
    let total: f64 = shares.iter().map(|s| s.2).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn empty_store_reports_no_data_everywhere() {
    let store = Store::open_in_memory().expect("open store");
    let outcomes = run_builtin(&store);
    assert_eq!(outcomes.len(), 13);
    for outcome in &outcomes {
        assert_eq!(outcome.result, ReportResult::Empty, "{}", outcome.name);
    }
}

#[test]
fn broken_report_does_not_stop_the_rest() {
    let catalog = ReportCatalog::from_json_str(
        r#"{"reports": [
            {"name": "broken", "sql": "SELECT * FROM no_such_table"},
            {"name": "count", "sql": "SELECT COUNT(*) AS n FROM sales_data"}
        ]}"#,
    )
    .expect("catalog");

    let outcomes = run_reports(&seeded_store(), &catalog, &QueryParams::default());
    assert!(matches!(outcomes[0].result, ReportResult::Failed(_)));
    assert_eq!(
        outcomes[1].result,
        ReportResult::Rows(ResultSet {
            columns: vec!["n".to_string()],
            rows: vec![vec![Value::Integer(8)]],
        })
    );
}
