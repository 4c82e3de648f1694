//! Sales transaction summaries for Rust.
//!
//! Loads a sales CSV (`date`, `region`, `product`, `units`, `price`) into an
//! in-process DuckDB table and reduces it to a fixed summary: row count,
//! distinct regions, top products by revenue and each region's latest 7-day
//! rolling mean of daily revenue.
//!
//! # Quick start
//!
//! ```no_run
//! use sales_summary::SalesSummarizer;
//!
//! let summarizer = SalesSummarizer::builder().input("data.csv").build().unwrap();
//!
//! let summary = summarizer.summarize().unwrap();
//! println!("{}", summary.to_json_pretty().unwrap());
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod sql_builder;

pub use connection::Connection;
pub use error::{Result, SummaryError};
pub use models::Summary;
pub use sql_builder::SqlBuilder;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// SalesSummarizerBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`SalesSummarizer`].
///
/// Use [`SalesSummarizer::builder()`] to obtain a builder and call
/// [`build()`](SalesSummarizerBuilder::build) to load the input.
pub struct SalesSummarizerBuilder {
    input: PathBuf,
}

impl Default for SalesSummarizerBuilder {
    fn default() -> Self {
        Self {
            input: PathBuf::from(config::DEFAULT_INPUT_PATH),
        }
    }
}

impl SalesSummarizerBuilder {
    /// Set the CSV file to read.
    ///
    /// Defaults to [`config::DEFAULT_INPUT_PATH`].
    pub fn input<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }

    /// Open the DuckDB connection and load the input CSV.
    ///
    /// Fails if the file is missing, lacks a required column, or contains a
    /// value that does not parse as its column's type.
    pub fn build(self) -> Result<SalesSummarizer> {
        let conn = Connection::new()?;
        conn.load_transactions_csv(&self.input)?;
        Ok(SalesSummarizer {
            conn,
            input: self.input,
        })
    }
}

// ---------------------------------------------------------------------------
// SalesSummarizer
// ---------------------------------------------------------------------------

/// The main entry point: a loaded transaction dataset and its reductions.
///
/// Query interfaces are lightweight wrappers borrowing the [`Connection`].
pub struct SalesSummarizer {
    conn: Connection,
    input: PathBuf,
}

impl SalesSummarizer {
    /// Create a new builder.
    pub fn builder() -> SalesSummarizerBuilder {
        SalesSummarizerBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access row and region counts.
    pub fn transactions(&self) -> queries::TransactionQuery<'_> {
        queries::TransactionQuery::new(&self.conn)
    }

    /// Access product revenue rankings.
    pub fn products(&self) -> queries::ProductQuery<'_> {
        queries::ProductQuery::new(&self.conn)
    }

    /// Access daily-region revenue and rolling means.
    pub fn rolling(&self) -> queries::RollingQuery<'_> {
        queries::RollingQuery::new(&self.conn)
    }

    // -- Summary -----------------------------------------------------------

    /// Compute the full summary.
    pub fn summarize(&self) -> Result<Summary> {
        let transactions = self.transactions();
        let row_count = transactions.row_count()?;
        let regions = transactions.region_count()?;
        let top_products = self.products().top_by_revenue(config::TOP_N_PRODUCTS)?;
        let latest_rolling = self.rolling().latest_by_region()?;

        log::info!("Summarized {} rows across {} regions", row_count, regions);

        Ok(Summary::new(row_count, regions, top_products, latest_rolling))
    }

    /// Execute a raw SQL query against the loaded data.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Path of the loaded CSV.
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    /// Return a reference to the underlying [`Connection`].
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Display for SalesSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SalesSummarizer(input={}, tables=[{}])",
            self.input.display(),
            self.conn.tables().join(", ")
        )
    }
}
