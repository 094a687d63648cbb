//! Buy/sell/alert decision rules.
//!
//! # Evaluation Semantics
//!
//! - Holding a position (`shares > 0`): sell rules only, checked in priority
//!   order resistance → sell_limit_3 → sell_limit_2 → sell_limit_1. The first
//!   match wins; a price that blows through every tier reports at the most
//!   extreme level it cleared.
//! - Not holding: buy rules only, support → buy_limit_3 → buy_limit_2 →
//!   buy_limit_1, same first-match-wins ordering.
//! - `alert_level` is an orthogonal notification channel: it can fire
//!   alongside a buy or sell signal.
//!
//! Unset thresholds (config `None`) never fire.

use crate::domain::asset::AssetConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Alert,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Alert => write!(f, "ALERT"),
        }
    }
}

/// The specific threshold rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerRule {
    Support,
    Resistance,
    BuyLimit(u8),
    SellLimit(u8),
    AlertLevel,
}

impl fmt::Display for TriggerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerRule::Support => write!(f, "support"),
            TriggerRule::Resistance => write!(f, "resistance"),
            TriggerRule::BuyLimit(tier) => write!(f, "buy_limit_{}", tier),
            TriggerRule::SellLimit(tier) => write!(f, "sell_limit_{}", tier),
            TriggerRule::AlertLevel => write!(f, "alert_level"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub action: Action,
    pub rule: TriggerRule,
}

/// Outcome of one evaluation: at most one trade signal, plus an optional
/// alert riding alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    pub trade: Option<Signal>,
    pub alert: Option<Signal>,
}

impl Decision {
    pub fn is_none(&self) -> bool {
        self.trade.is_none() && self.alert.is_none()
    }

    /// Fired signals in notification order (trade first).
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.trade.iter().chain(self.alert.iter())
    }
}

/// Evaluate all threshold rules for one asset at the current price.
pub fn evaluate(asset: &AssetConfig, current_price: f64) -> Decision {
    let trade = if asset.is_holding() {
        sell_signal(asset, current_price)
    } else {
        buy_signal(asset, current_price)
    };

    let alert = match asset.alert_level {
        Some(level) if current_price >= level => Some(Signal {
            action: Action::Alert,
            rule: TriggerRule::AlertLevel,
        }),
        _ => None,
    };

    Decision { trade, alert }
}

fn sell_signal(asset: &AssetConfig, price: f64) -> Option<Signal> {
    let reached = |threshold: Option<f64>| matches!(threshold, Some(t) if price >= t);

    let rule = if reached(asset.resistance) {
        TriggerRule::Resistance
    } else if reached(asset.sell_limit_3) {
        TriggerRule::SellLimit(3)
    } else if reached(asset.sell_limit_2) {
        TriggerRule::SellLimit(2)
    } else if reached(asset.sell_limit_1) {
        TriggerRule::SellLimit(1)
    } else {
        return None;
    };

    Some(Signal {
        action: Action::Sell,
        rule,
    })
}

fn buy_signal(asset: &AssetConfig, price: f64) -> Option<Signal> {
    let reached = |threshold: Option<f64>| matches!(threshold, Some(t) if price <= t);

    let rule = if reached(asset.support) {
        TriggerRule::Support
    } else if reached(asset.buy_limit_3) {
        TriggerRule::BuyLimit(3)
    } else if reached(asset.buy_limit_2) {
        TriggerRule::BuyLimit(2)
    } else if reached(asset.buy_limit_1) {
        TriggerRule::BuyLimit(1)
    } else {
        return None;
    };

    Some(Signal {
        action: Action::Buy,
        rule,
    })
}
