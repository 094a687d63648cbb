//! Normalized market-data snapshot for one symbol at one instant.

use serde::{Deserialize, Serialize};

/// One asset's market data at one point in time, in USD.
///
/// Fields the upstream quote omits normalize to 0 at the adapter boundary,
/// so a sample is always fully populated. Samples are created fresh per fetch
/// and never mutated; the history store appends them as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub symbol: String,
    pub price: f64,
    pub volume_24h: f64,
    pub volume_change_24h: f64,
    pub percent_change_1h: f64,
    pub percent_change_24h: f64,
    pub percent_change_7d: f64,
    pub percent_change_30d: f64,
    pub percent_change_60d: f64,
    pub percent_change_90d: f64,
    pub market_cap: f64,
    /// Sample timestamp, epoch milliseconds.
    pub fetched_at: i64,
}
