use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ProductRevenue — Total revenue of one product across all regions and dates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product: String,
    pub revenue: f64,
}

// ---------------------------------------------------------------------------
// DailyRevenuePoint — Summed revenue of one region on one calendar date
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenuePoint {
    pub region: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub revenue: f64,
}

// ---------------------------------------------------------------------------
// RollingRevenue — Trailing time-windowed mean of daily revenue
// ---------------------------------------------------------------------------

/// Rolling mean of a region's daily revenue at one date.
///
/// `date` is `None` for a region that has rows but no dated ones; such a
/// region has no anchor and therefore no rolling value either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingRevenue {
    pub region: String,
    pub date: Option<String>,
    pub rolling_revenue: Option<f64>,
}
