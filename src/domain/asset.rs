//! Watchlist asset configuration.
//!
//! Thresholds are `Option`-typed: the config loader maps absent *and* zero
//! values to `None`, so the evaluation rules never have to distinguish "0 as
//! placeholder" from "0 as a real level". Buy tiers descend
//! (`buy_limit_1 > buy_limit_2 > buy_limit_3`), sell tiers ascend.

#[derive(Debug, Clone, PartialEq)]
pub struct AssetConfig {
    pub symbol: String,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub buy_limit_1: Option<f64>,
    pub buy_limit_2: Option<f64>,
    pub buy_limit_3: Option<f64>,
    pub sell_limit_1: Option<f64>,
    pub sell_limit_2: Option<f64>,
    pub sell_limit_3: Option<f64>,
    /// Cost basis per share of the held position. Meaningful only when
    /// `shares > 0`.
    pub entry: f64,
    pub shares: f64,
    /// Absolute price ceiling for a pure notification with no trade
    /// implication.
    pub alert_level: Option<f64>,
    pub enabled: bool,
    /// Optional what-if position evaluated alongside the real one.
    pub scenario: Option<ScenarioConfig>,
}

/// A hypothetical position for scenario planning. Only constructed when both
/// entry and shares are nonzero.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub entry: f64,
    pub shares: f64,
    pub sell_limit: Option<f64>,
}

impl AssetConfig {
    /// An empty, enabled config with no thresholds and no position.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            support: None,
            resistance: None,
            buy_limit_1: None,
            buy_limit_2: None,
            buy_limit_3: None,
            sell_limit_1: None,
            sell_limit_2: None,
            sell_limit_3: None,
            entry: 0.0,
            shares: 0.0,
            alert_level: None,
            enabled: true,
            scenario: None,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.shares > 0.0
    }

    /// Configured sell tiers as `(tier, limit)` pairs, lowest tier first.
    pub fn sell_limits(&self) -> Vec<(u8, f64)> {
        [
            (1, self.sell_limit_1),
            (2, self.sell_limit_2),
            (3, self.sell_limit_3),
        ]
        .into_iter()
        .filter_map(|(tier, limit)| limit.map(|l| (tier, l)))
        .collect()
    }
}
