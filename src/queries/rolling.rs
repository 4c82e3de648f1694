//! Per-region daily revenue and its trailing time-windowed mean.
//!
//! A region's rolling value at date `d` is the mean of its daily revenue
//! points dated within `[d - (ROLLING_WINDOW_DAYS - 1), d]`. The window is a
//! calendar span, not a row count: gaps in the data shrink the number of
//! points averaged, never widen the span.

use crate::config::{ROLLING_WINDOW_DAYS, TRANSACTIONS_TABLE};
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{DailyRevenuePoint, RollingRevenue};
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// RollingQuery
// ---------------------------------------------------------------------------

/// Query interface for daily-region revenue points and rolling means.
pub struct RollingQuery<'a> {
    conn: &'a Connection,
}

impl<'a> RollingQuery<'a> {
    /// Create a new `RollingQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Daily-region revenue points, ordered by region then date.
    ///
    /// One point per `(region, date)` pair present in the input; days with no
    /// sales produce no point. All filters are optional and dates are
    /// inclusive ISO `YYYY-MM-DD` bounds.
    pub fn daily_points(
        &self,
        region: Option<&str>,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Result<Vec<DailyRevenuePoint>> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let mut qb = SqlBuilder::new(TRANSACTIONS_TABLE);
        qb.select(&[
            "region",
            "CAST(\"date\" AS VARCHAR) AS date",
            "COALESCE(SUM(revenue), 0.0) AS revenue",
        ])
        .where_clause("region IS NOT NULL AND \"date\" IS NOT NULL", &[]);

        if let Some(r) = region {
            qb.where_eq("region", r);
        }
        if let Some(df) = date_from {
            qb.where_clause("\"date\" >= CAST(? AS DATE)", &[df]);
        }
        if let Some(dt) = date_to {
            qb.where_clause("\"date\" <= CAST(? AS DATE)", &[dt]);
        }

        qb.group_by(&["region", "\"date\""])
            .order_by(&["region ASC", "\"date\" ASC"]);

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    /// The rolling value at every daily point of one region, oldest first.
    pub fn series(&self, region: &str) -> Result<Vec<RollingRevenue>> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let sql = format!(
            "{}
            SELECT region, CAST(\"date\" AS VARCHAR) AS date, rolling_revenue
            FROM rolled
            WHERE region = ?
            ORDER BY rolled.\"date\" ASC",
            rolling_cte()
        );

        self.conn.execute_into(&sql, &[region.to_string()])
    }

    /// The rolling value at each region's latest date, ordered by region.
    ///
    /// Every distinct region in the input appears exactly once. A region whose
    /// rows all lack a date has no anchor and is returned with `None` date
    /// and value.
    pub fn latest_by_region(&self) -> Result<Vec<RollingRevenue>> {
        self.conn.require_table(TRANSACTIONS_TABLE)?;

        let sql = format!(
            "{}
            SELECT
                observed.region AS region,
                CAST(latest.\"date\" AS VARCHAR) AS date,
                latest.rolling_revenue AS rolling_revenue
            FROM (
                SELECT DISTINCT region FROM {} WHERE region IS NOT NULL
            ) AS observed
            LEFT JOIN rolled AS latest
                ON latest.region = observed.region AND latest.recency = 1
            ORDER BY observed.region ASC",
            rolling_cte(),
            TRANSACTIONS_TABLE
        );

        self.conn.execute_into(&sql, &[])
    }
}

/// `daily` sums revenue per `(region, date)`; `rolled` attaches the rolling
/// mean and a `recency` rank (1 = latest date in the region).
fn rolling_cte() -> String {
    let lookback_days = ROLLING_WINDOW_DAYS.saturating_sub(1);
    format!(
        "WITH daily AS (
            SELECT region, \"date\", COALESCE(SUM(revenue), 0.0) AS revenue
            FROM {table}
            WHERE region IS NOT NULL AND \"date\" IS NOT NULL
            GROUP BY region, \"date\"
        ),
        rolled AS (
            SELECT
                region,
                \"date\",
                AVG(revenue) OVER (
                    PARTITION BY region
                    ORDER BY \"date\" ASC
                    RANGE BETWEEN INTERVAL '{lookback} days' PRECEDING AND CURRENT ROW
                ) AS rolling_revenue,
                ROW_NUMBER() OVER (
                    PARTITION BY region
                    ORDER BY \"date\" DESC
                ) AS recency
            FROM daily
        )",
        table = TRANSACTIONS_TABLE,
        lookback = lookback_days
    )
}
