use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Transaction — One typed input row plus its derived revenue
// ---------------------------------------------------------------------------

/// A sales record as stored in the `transactions` table.
///
/// Every field is optional because an empty CSV cell loads as `NULL`.
/// `revenue` is `units * price` and is `None` whenever either factor is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: Option<String>,
    pub region: Option<String>,
    pub product: Option<String>,
    pub units: Option<f64>,
    pub price: Option<f64>,
    pub revenue: Option<f64>,
}
