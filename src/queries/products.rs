//! Product revenue rankings.

use crate::config::TRANSACTIONS_TABLE;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::ProductRevenue;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// ProductQuery
// ---------------------------------------------------------------------------

/// Query interface for per-product revenue totals.
///
/// Ordering is revenue descending, then product name ascending, so equal
/// totals always rank the same way.
pub struct ProductQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ProductQuery<'a> {
    /// Create a new `ProductQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Summed revenue of every product, ranked.
    pub fn totals(&self) -> Result<Vec<ProductRevenue>> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let (sql, params) = ranked_totals().build();
        self.conn.execute_into(&sql, &params)
    }

    /// The `n` highest-revenue products, ranked. Fewer when fewer exist.
    pub fn top_by_revenue(&self, n: usize) -> Result<Vec<ProductRevenue>> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let (sql, params) = ranked_totals().limit(n).build();
        self.conn.execute_into(&sql, &params)
    }
}

/// Rows with no product are skipped; a product whose revenue is entirely
/// missing totals 0.
fn ranked_totals() -> SqlBuilder {
    let mut qb = SqlBuilder::new(TRANSACTIONS_TABLE);
    qb.select(&["product", "COALESCE(SUM(revenue), 0.0) AS revenue"])
        .where_clause("product IS NOT NULL", &[])
        .group_by(&["product"])
        .order_by(&["revenue DESC", "product ASC"]);
    qb
}
