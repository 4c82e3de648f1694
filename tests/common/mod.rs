//! Shared test fixtures for the sales-summary integration tests.
//!
//! Provides helpers that write small CSVs to temp files and load them into a
//! [`SalesSummarizer`], plus `setup_sample_summarizer()` with a fixed
//! three-region dataset.

#![allow(dead_code)]

use sales_summary::SalesSummarizer;
use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "date,region,product,units,price";

/// Write `contents` verbatim to a temp `.csv` file.
///
/// The caller must keep the returned file alive while the path is used.
pub fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Write a CSV with the standard header followed by `rows`.
pub fn write_rows(rows: &[&str]) -> NamedTempFile {
    let mut contents = String::from(HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    write_csv(&contents)
}

/// Load `rows` (standard header) into a summarizer.
///
/// Returns `(SalesSummarizer, NamedTempFile)`. DuckDB copies the data into
/// an in-memory table on load, but the file is returned so tests can inspect
/// the path.
pub fn summarizer_for(rows: &[&str]) -> (SalesSummarizer, NamedTempFile) {
    let file = write_rows(rows);
    let summarizer = SalesSummarizer::builder()
        .input(file.path())
        .build()
        .unwrap();
    (summarizer, file)
}

/// Three regions over nine days.
///
/// Daily revenue per region:
/// - north: 01-01 = 20, 01-03 = 80 (two rows), 01-09 = 20
/// - south: 01-02 = 50, 01-04 = 5
/// - east:  01-05 = 100
///
/// Product totals: gadget 150, widget 100, gizmo 20, doohickey 5.
pub fn setup_sample_summarizer() -> (SalesSummarizer, NamedTempFile) {
    summarizer_for(&[
        "2024-01-01,north,widget,2,10",
        "2024-01-03,north,gadget,1,50",
        "2024-01-03,north,widget,3,10",
        "2024-01-09,north,gizmo,4,5",
        "2024-01-02,south,widget,5,10",
        "2024-01-04,south,doohickey,1,5",
        "2024-01-05,east,gadget,2,50",
    ])
}

/// Assert two floats are equal within a small tolerance.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
