//! Position economics reports.
//!
//! A report is recomputed from scratch every cycle and never persisted. Both
//! the real position and the what-if scenario are priced with taker fees,
//! the conservative assumption for a market exit.

use crate::domain::asset::{AssetConfig, ScenarioConfig};
use crate::domain::fees::{FeeCalculator, FeeType, TradeProfitResult};
use crate::domain::indicator::{
    calculate_ema, calculate_rsi, calculate_sma, Rsi, DEFAULT_PERIOD,
};
use crate::domain::price::PriceSample;
use crate::domain::range::range_spread_percent;
use serde::Serialize;

/// Profit outcome at one configured sell-limit tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitProfit {
    pub tier: u8,
    pub sell_price: f64,
    pub profit: TradeProfitResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    pub entry_price: f64,
    pub shares: f64,
    pub tax_rate_pct: f64,
    /// Cost basis including the entry-leg exchange fee.
    pub transaction_cost: f64,
    /// Profit if sold at the current price.
    pub sell_now: TradeProfitResult,
    /// Profit at each configured sell-limit tier.
    pub sell_at_limit: Vec<LimitProfit>,
}

/// Indicator values for the report; each is omitted when the history window
/// is too short.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<Rsi>,
    pub sma: Option<f64>,
    pub ema: Option<f64>,
}

/// Everything one evaluation cycle learned about one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetReport {
    pub quote: PriceSample,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    /// Relative spread between support and resistance, when both are set.
    pub trade_range_pct: Option<f64>,
    pub indicators: IndicatorSnapshot,
    pub position: Option<PositionReport>,
    pub scenario: Option<PositionReport>,
}

/// Report for the held position. `None` when there is no position — an
/// expected state, not an error.
pub fn position_report(
    asset: &AssetConfig,
    current_price: f64,
    calc: &FeeCalculator,
) -> Option<PositionReport> {
    if !asset.is_holding() {
        return None;
    }

    let sell_at_limit = asset
        .sell_limits()
        .into_iter()
        .map(|(tier, sell_price)| LimitProfit {
            tier,
            sell_price,
            profit: calc.trade_profit(asset.entry, sell_price, asset.shares, FeeType::Taker),
        })
        .collect();

    Some(PositionReport {
        entry_price: asset.entry,
        shares: asset.shares,
        tax_rate_pct: calc.schedule().tax_rate_pct,
        transaction_cost: calc.transaction_cost(asset.entry, asset.shares, FeeType::Taker),
        sell_now: calc.trade_profit(asset.entry, current_price, asset.shares, FeeType::Taker),
        sell_at_limit,
    })
}

/// Report for the what-if scenario. `None` unless the scenario is fully
/// specified (nonzero entry and shares).
pub fn scenario_report(
    scenario: &ScenarioConfig,
    current_price: f64,
    calc: &FeeCalculator,
) -> Option<PositionReport> {
    if scenario.shares <= 0.0 || scenario.entry <= 0.0 {
        return None;
    }

    let sell_at_limit = scenario
        .sell_limit
        .map(|sell_price| LimitProfit {
            tier: 1,
            sell_price,
            profit: calc.trade_profit(scenario.entry, sell_price, scenario.shares, FeeType::Taker),
        })
        .into_iter()
        .collect();

    Some(PositionReport {
        entry_price: scenario.entry,
        shares: scenario.shares,
        tax_rate_pct: calc.schedule().tax_rate_pct,
        transaction_cost: calc.transaction_cost(scenario.entry, scenario.shares, FeeType::Taker),
        sell_now: calc.trade_profit(scenario.entry, current_price, scenario.shares, FeeType::Taker),
        sell_at_limit,
    })
}

/// Build the full report for one asset from the current quote and its stored
/// history.
pub fn asset_report(
    asset: &AssetConfig,
    quote: PriceSample,
    history: &[PriceSample],
    calc: &FeeCalculator,
) -> AssetReport {
    let current_price = quote.price;

    let trade_range_pct = match (asset.support, asset.resistance) {
        (Some(support), Some(resistance)) => Some(range_spread_percent(support, resistance)),
        _ => None,
    };

    let indicators = IndicatorSnapshot {
        rsi: calculate_rsi(history, DEFAULT_PERIOD as i64).ok(),
        sma: calculate_sma(history, DEFAULT_PERIOD).ok(),
        ema: calculate_ema(history, DEFAULT_PERIOD).ok(),
    };

    AssetReport {
        support: asset.support,
        resistance: asset.resistance,
        trade_range_pct,
        indicators,
        position: position_report(asset, current_price, calc),
        scenario: asset
            .scenario
            .as_ref()
            .and_then(|s| scenario_report(s, current_price, calc)),
        quote,
    }
}
