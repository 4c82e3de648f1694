use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::revenue::{ProductRevenue, RollingRevenue};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Summary — The emitted JSON document
// ---------------------------------------------------------------------------

/// Aggregated statistics over one transaction dataset.
///
/// Field order is the serialized key order. Regions in
/// `rolling_7d_revenue_by_region` are sorted by name; a region without a
/// defined rolling value maps to `null` rather than being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub row_count: u64,
    pub regions: u64,
    pub top_n_products_by_revenue: Vec<ProductRevenue>,
    pub rolling_7d_revenue_by_region: BTreeMap<String, Option<f64>>,
}

impl Summary {
    /// Assemble a summary from the individual reductions.
    ///
    /// Non-finite rolling values are stored as `None`.
    pub fn new(
        row_count: u64,
        regions: u64,
        top_products: Vec<ProductRevenue>,
        latest_rolling: Vec<RollingRevenue>,
    ) -> Self {
        let rolling_7d_revenue_by_region = latest_rolling
            .into_iter()
            .map(|r| (r.region, r.rolling_revenue.filter(|v| v.is_finite())))
            .collect();

        Self {
            row_count,
            regions,
            top_n_products_by_revenue: top_products,
            rolling_7d_revenue_by_region,
        }
    }

    /// Render as pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
