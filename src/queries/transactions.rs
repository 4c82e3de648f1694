//! Row and region counts over the `transactions` table.

use crate::config::TRANSACTIONS_TABLE;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::Transaction;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// TransactionQuery
// ---------------------------------------------------------------------------

/// Query interface for the raw loaded transactions.
pub struct TransactionQuery<'a> {
    conn: &'a Connection,
}

impl<'a> TransactionQuery<'a> {
    /// Create a new `TransactionQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Total number of input rows, including rows with empty cells.
    pub fn row_count(&self) -> Result<u64> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let (sql, params) = SqlBuilder::new(TRANSACTIONS_TABLE)
            .select(&["COUNT(*) AS row_count"])
            .build();

        let value = self.conn.execute_scalar(&sql, &params)?;
        Ok(value.and_then(|v| v.as_u64()).unwrap_or(0))
    }

    /// Number of distinct regions. Rows without a region are not counted.
    pub fn region_count(&self) -> Result<u64> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let (sql, params) = SqlBuilder::new(TRANSACTIONS_TABLE)
            .select(&["COUNT(DISTINCT region) AS regions"])
            .build();

        let value = self.conn.execute_scalar(&sql, &params)?;
        Ok(value.and_then(|v| v.as_u64()).unwrap_or(0))
    }

    /// Distinct region names, sorted ascending.
    pub fn regions(&self) -> Result<Vec<String>> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let (sql, params) = SqlBuilder::new(TRANSACTIONS_TABLE)
            .select(&["region"])
            .distinct()
            .where_clause("region IS NOT NULL", &[])
            .order_by(&["region ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|mut r| match r.remove("region") {
                Some(serde_json::Value::String(s)) => Some(s),
                _ => None,
            })
            .collect())
    }

    /// Every loaded row in file order, with its derived revenue.
    pub fn all(&self) -> Result<Vec<Transaction>> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let (sql, params) = SqlBuilder::new(TRANSACTIONS_TABLE)
            .select(&[
                "CAST(\"date\" AS VARCHAR) AS date",
                "region",
                "product",
                "units",
                "price",
                "revenue",
            ])
            .order_by(&["rowid ASC"])
            .build();

        self.conn.execute_into(&sql, &params)
    }
}
