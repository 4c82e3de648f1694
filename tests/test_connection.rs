//! Connection integration tests: CSV loading, raw SQL execution, table tracking.

mod common;

use sales_summary::{Connection, SummaryError};
use std::path::Path;

// ---------------------------------------------------------------------------
// load_transactions_csv
// ---------------------------------------------------------------------------

#[test]
fn load_creates_typed_table_with_revenue() {
    let file = common::write_rows(&["2024-01-01,north,widget,2,10.5"]);
    let conn = Connection::new().unwrap();
    conn.load_transactions_csv(file.path()).unwrap();

    let rows = conn
        .execute(
            "SELECT CAST(\"date\" AS VARCHAR) AS date, region, product, units, price, revenue \
             FROM transactions",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["date"], "2024-01-01");
    assert_eq!(rows[0]["region"], "north");
    assert_eq!(rows[0]["product"], "widget");
    common::assert_close(rows[0]["units"].as_f64().unwrap(), 2.0);
    common::assert_close(rows[0]["price"].as_f64().unwrap(), 10.5);
    common::assert_close(rows[0]["revenue"].as_f64().unwrap(), 21.0);
}

#[test]
fn load_marks_table_as_loaded() {
    let file = common::write_rows(&["2024-01-01,north,widget,1,1"]);
    let conn = Connection::new().unwrap();
    assert!(!conn.has_table("transactions"));

    conn.load_transactions_csv(file.path()).unwrap();

    assert!(conn.has_table("transactions"));
    assert_eq!(conn.tables(), vec!["transactions".to_string()]);
}

#[test]
fn load_replaces_previous_table() {
    let first = common::write_rows(&["2024-01-01,north,widget,1,1", "2024-01-02,north,widget,1,1"]);
    let second = common::write_rows(&["2024-02-01,south,gadget,1,1"]);
    let conn = Connection::new().unwrap();

    conn.load_transactions_csv(first.path()).unwrap();
    conn.load_transactions_csv(second.path()).unwrap();

    let count = conn
        .execute_scalar("SELECT COUNT(*) FROM transactions", &[])
        .unwrap()
        .unwrap();
    assert_eq!(count.as_i64().unwrap(), 1);
}

#[test]
fn load_ignores_extra_columns_and_column_order() {
    let file = common::write_csv(
        "price,channel,units,product,region,date\n\
         10,web,3,widget,north,2024-01-01\n",
    );
    let conn = Connection::new().unwrap();
    conn.load_transactions_csv(file.path()).unwrap();

    let rows = conn.execute("SELECT * FROM transactions", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].contains_key("channel"));
    common::assert_close(rows[0]["revenue"].as_f64().unwrap(), 30.0);
}

#[test]
fn empty_cells_load_as_null() {
    let file = common::write_rows(&["2024-01-01,,widget,,10"]);
    let conn = Connection::new().unwrap();
    conn.load_transactions_csv(file.path()).unwrap();

    let rows = conn
        .execute("SELECT region, units, revenue FROM transactions", &[])
        .unwrap();
    assert!(rows[0]["region"].is_null());
    assert!(rows[0]["units"].is_null());
    assert!(rows[0]["revenue"].is_null());
}

fn loaded_dates(rows: &[&str]) -> Vec<String> {
    let file = common::write_rows(rows);
    let conn = Connection::new().unwrap();
    conn.load_transactions_csv(file.path()).unwrap();
    conn.execute(
        "SELECT CAST(\"date\" AS VARCHAR) AS date FROM transactions ORDER BY rowid",
        &[],
    )
    .unwrap()
    .into_iter()
    .map(|row| row["date"].as_str().unwrap().to_string())
    .collect()
}

#[test]
fn slash_dates_are_read_month_first() {
    let dates = loaded_dates(&["01/02/2024,A,X,1,10", "01/05/2024,A,X,1,20"]);
    assert_eq!(dates, vec!["2024-01-02", "2024-01-05"]);
}

#[test]
fn slash_dates_that_only_fit_month_first_load() {
    let dates = loaded_dates(&["12/31/2023,A,X,1,10", "01/13/2024,A,X,1,20"]);
    assert_eq!(dates, vec!["2023-12-31", "2024-01-13"]);
}

#[test]
fn mixed_date_layouts_load_to_calendar_days() {
    let dates = loaded_dates(&[
        "2024-01-01,A,X,1,1",
        "2024/01/05,A,X,1,1",
        "2024-01-07 13:45:00,A,X,1,1",
    ]);
    assert_eq!(dates, vec!["2024-01-01", "2024-01-05", "2024-01-07"]);
}

#[test]
fn empty_date_stays_null() {
    let file = common::write_rows(&["2024-01-01,A,X,1,1", ",A,X,1,1"]);
    let conn = Connection::new().unwrap();
    conn.load_transactions_csv(file.path()).unwrap();
    let date = conn
        .execute_scalar("SELECT \"date\" FROM transactions WHERE rowid = 1", &[])
        .unwrap()
        .unwrap();
    assert!(date.is_null());
}

// ---------------------------------------------------------------------------
// Load failures
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_input_not_found() {
    let conn = Connection::new().unwrap();
    let err = conn
        .load_transactions_csv(Path::new("definitely/not/here.csv"))
        .unwrap_err();
    assert!(matches!(err, SummaryError::InputNotFound(_)));
    assert!(!conn.has_table("transactions"));
}

#[test]
fn missing_column_is_reported_by_name() {
    let file = common::write_csv("date,region,product,units\n2024-01-01,north,widget,2\n");
    let conn = Connection::new().unwrap();
    let err = conn.load_transactions_csv(file.path()).unwrap_err();
    match err {
        SummaryError::MissingColumn(name) => assert_eq!(name, "price"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn first_missing_column_follows_schema_order() {
    let file = common::write_csv("units,price\n1,2\n");
    let conn = Connection::new().unwrap();
    let err = conn.load_transactions_csv(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "Missing required column: date");
}

#[test]
fn unparseable_date_aborts_load() {
    let file = common::write_rows(&["2024-01-01,north,widget,1,1", "not-a-date,north,widget,1,1"]);
    let conn = Connection::new().unwrap();
    let err = conn.load_transactions_csv(file.path()).unwrap_err();
    assert!(matches!(err, SummaryError::DuckDb(_)));
    assert!(!conn.has_table("transactions"));
}

#[test]
fn day_first_only_date_aborts_load() {
    let file = common::write_rows(&["13/01/2024,north,widget,1,1"]);
    let conn = Connection::new().unwrap();
    let err = conn.load_transactions_csv(file.path()).unwrap_err();
    assert!(matches!(err, SummaryError::DuckDb(_)));
}

#[test]
fn semicolon_delimited_file_is_missing_columns() {
    let file = common::write_csv(
        "date;region;product;units;price\n\
         2024-01-01;north;widget;2;10\n",
    );
    let conn = Connection::new().unwrap();
    let err = conn.load_transactions_csv(file.path()).unwrap_err();
    match err {
        SummaryError::MissingColumn(name) => assert_eq!(name, "date"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
    assert!(!conn.has_table("transactions"));
}

#[test]
fn non_numeric_units_abort_load() {
    let file = common::write_rows(&["2024-01-01,north,widget,lots,1"]);
    let conn = Connection::new().unwrap();
    let err = conn.load_transactions_csv(file.path()).unwrap_err();
    assert!(matches!(err, SummaryError::DuckDb(_)));
}

#[test]
fn non_numeric_price_aborts_load() {
    let file = common::write_rows(&["2024-01-01,north,widget,1,cheap"]);
    let conn = Connection::new().unwrap();
    let err = conn.load_transactions_csv(file.path()).unwrap_err();
    assert!(matches!(err, SummaryError::DuckDb(_)));
}

// ---------------------------------------------------------------------------
// execute / execute_scalar / execute_into
// ---------------------------------------------------------------------------

#[test]
fn execute_with_params() {
    let (summarizer, _file) = common::setup_sample_summarizer();
    let conn = summarizer.connection();

    let rows = conn
        .execute(
            "SELECT * FROM transactions WHERE region = ?",
            &["south".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn execute_returns_empty_for_no_matches() {
    let (summarizer, _file) = common::setup_sample_summarizer();

    let rows = summarizer
        .connection()
        .execute(
            "SELECT * FROM transactions WHERE region = ?",
            &["west".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let (summarizer, _file) = common::setup_sample_summarizer();

    let result = summarizer
        .connection()
        .execute_scalar(
            "SELECT product FROM transactions WHERE region = ?",
            &["west".to_string()],
        )
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn execute_into_deserializes_rows() {
    let (summarizer, _file) = common::setup_sample_summarizer();

    #[derive(serde::Deserialize, Debug)]
    struct RegionRevenue {
        region: String,
        total: f64,
    }

    let rows: Vec<RegionRevenue> = summarizer
        .connection()
        .execute_into(
            "SELECT region, SUM(revenue) AS total FROM transactions \
             GROUP BY region ORDER BY region",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].region, "east");
    common::assert_close(rows[0].total, 100.0);
}

#[test]
fn nan_doubles_are_converted_to_json_null() {
    let conn = Connection::new().unwrap();
    let value = conn
        .execute_scalar("SELECT 'NaN'::DOUBLE", &[])
        .unwrap()
        .unwrap();
    assert!(value.is_null());
}

// ---------------------------------------------------------------------------
// require_table / raw
// ---------------------------------------------------------------------------

#[test]
fn require_table_fails_before_load() {
    let conn = Connection::new().unwrap();
    let err = conn.require_table("transactions").unwrap_err();
    assert!(matches!(err, SummaryError::InvalidArgument(_)));
}

#[test]
fn raw_provides_access_to_underlying_duckdb_connection() {
    let conn = Connection::new().unwrap();

    conn.raw()
        .execute_batch("CREATE TABLE raw_test (id INTEGER, value TEXT)")
        .unwrap();
    conn.raw()
        .execute_batch("INSERT INTO raw_test VALUES (1, 'hello')")
        .unwrap();

    let rows = conn.execute("SELECT * FROM raw_test", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["value"], "hello");
}
