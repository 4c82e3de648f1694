/// CSV read when no other input is given, relative to the working directory.
pub const DEFAULT_INPUT_PATH: &str = "data.csv";

/// Name of the DuckDB table holding the loaded transactions.
pub const TRANSACTIONS_TABLE: &str = "transactions";

/// Number of products reported in `top_n_products_by_revenue`.
pub const TOP_N_PRODUCTS: usize = 3;

/// Width of the trailing rolling window, in calendar days (anchor included).
pub const ROLLING_WINDOW_DAYS: u32 = 7;

/// Text date layouts tried after ISO `YYYY-MM-DD`, in order.
///
/// Slash-separated dates are read month-first.
pub const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y/%m/%d", "%Y-%m-%d %H:%M:%S"];

/// Required input columns and the SQL type each is cast to on load.
///
/// Order matters: missing columns are reported in this order.
pub fn transaction_columns() -> Vec<(&'static str, &'static str)> {
    vec![
        ("date", "DATE"),
        ("region", "VARCHAR"),
        ("product", "VARCHAR"),
        ("units", "DOUBLE"),
        ("price", "DOUBLE"),
    ]
}
