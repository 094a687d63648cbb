//! Exchange fee, transaction cost, and trade profit arithmetic.
//!
//! All rates are percentages (e.g. `0.5` means 0.5%). Tax applies to the
//! gross profit even when it is negative, offsetting part of the loss.

use serde::Serialize;

/// Fee schedule selector. Any string that is not `maker` (case-insensitive)
/// parses as `Taker` — the documented default, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeeType {
    Maker,
    #[default]
    Taker,
}

impl FeeType {
    pub fn parse(s: &str) -> FeeType {
        if s.eq_ignore_ascii_case("maker") {
            FeeType::Maker
        } else {
            FeeType::Taker
        }
    }
}

/// Percentage constants for fee and tax math, loaded once from configuration
/// and passed in explicitly so tests can pin the rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSchedule {
    pub maker_fee_pct: f64,
    pub taker_fee_pct: f64,
    pub tax_rate_pct: f64,
}

impl FeeSchedule {
    pub fn rate_pct(&self, fee_type: FeeType) -> f64 {
        match fee_type {
            FeeType::Maker => self.maker_fee_pct,
            FeeType::Taker => self.taker_fee_pct,
        }
    }
}

/// Outcome of selling a position at a given price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeProfitResult {
    pub gross_profit: f64,
    pub exchange_fee: f64,
    pub tax_owed: f64,
    pub net_profit: f64,
    /// Net profit relative to the invested amount. `None` when
    /// `entry × shares == 0`: the ratio is undefined there, and callers must
    /// not read it as a zero return.
    pub net_profit_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct FeeCalculator {
    schedule: FeeSchedule,
}

impl FeeCalculator {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// rate(fee_type) × price × shares. Linear in both price and shares.
    pub fn exchange_fee(&self, price: f64, shares: f64, fee_type: FeeType) -> f64 {
        self.schedule.rate_pct(fee_type) / 100.0 * price * shares
    }

    /// Cost basis including the entry-leg exchange fee. 0 for an empty
    /// position.
    pub fn transaction_cost(&self, entry_price: f64, shares: f64, fee_type: FeeType) -> f64 {
        if shares == 0.0 {
            return 0.0;
        }
        entry_price * shares + self.exchange_fee(entry_price, shares, fee_type)
    }

    /// Profit of selling `shares` bought at `entry_price` for `sell_price`.
    /// The exchange fee is charged on the sell leg; tax applies to the gross
    /// profit whether positive or negative.
    pub fn trade_profit(
        &self,
        entry_price: f64,
        sell_price: f64,
        shares: f64,
        fee_type: FeeType,
    ) -> TradeProfitResult {
        let gross_profit = (sell_price - entry_price) * shares;
        let exchange_fee = self.exchange_fee(sell_price, shares, fee_type);
        let tax_owed = self.schedule.tax_rate_pct / 100.0 * gross_profit;
        let net_profit = gross_profit - exchange_fee - tax_owed;

        let investment = entry_price * shares;
        let net_profit_pct = if investment == 0.0 {
            None
        } else {
            Some(net_profit / investment * 100.0)
        };

        TradeProfitResult {
            gross_profit,
            exchange_fee,
            tax_owed,
            net_profit,
            net_profit_pct,
        }
    }
}
